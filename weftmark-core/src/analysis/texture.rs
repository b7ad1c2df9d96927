//! Texture analysis: local binary patterns and co-occurrence statistics.

use image::GrayImage;

use crate::config::ExtractionConfig;
use crate::descriptor::{FeatureCategory, TextureDescriptor};
use crate::error::{Result, WeftmarkError};

const MAX_INTENSITY_LEVELS: usize = 256;

/// Compute the texture descriptor of the smoothed grayscale image.
///
/// Mean and standard deviation come from the local binary pattern transform;
/// contrast and homogeneity come from the normalized horizontal distance-1
/// co-occurrence matrix.
pub fn analyze(smoothed: &GrayImage, config: &ExtractionConfig) -> Result<TextureDescriptor> {
    let (mean_intensity, std_deviation) =
        neighborhood_stats(smoothed, config.lbp_radius, config.lbp_neighbors)?;
    let (contrast, homogeneity) = cooccurrence_stats(smoothed, config.cooccurrence_levels)?;

    Ok(TextureDescriptor {
        mean_intensity,
        std_deviation,
        contrast,
        homogeneity,
    })
}

/// Local binary pattern transform over interior pixels.
///
/// For every interior pixel, `neighbors` samples are taken at `radius` in
/// fixed ascending angular order (bilinear interpolation for fractional
/// coordinates); each neighbor at or above the center value sets one bit of
/// the per-pixel code. Returns mean and population standard deviation of the
/// codes.
fn neighborhood_stats(img: &GrayImage, radius: f64, neighbors: u32) -> Result<(f64, f64)> {
    let (width, height) = img.dimensions();
    let margin = radius.ceil().max(1.0) as u32;
    if width <= 2 * margin || height <= 2 * margin {
        return Err(WeftmarkError::analysis(
            FeatureCategory::Texture,
            format!("image {width}x{height} smaller than sampling neighborhood"),
        ));
    }

    let angle_step = std::f64::consts::TAU / f64::from(neighbors);
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut count = 0u64;

    for y in margin..height - margin {
        for x in margin..width - margin {
            let center = f64::from(img.get_pixel(x, y).0[0]);
            let mut code = 0u32;
            for n in 0..neighbors {
                let angle = angle_step * f64::from(n);
                let sample_x = f64::from(x) + radius * angle.cos();
                let sample_y = f64::from(y) - radius * angle.sin();
                if bilinear(img, sample_x, sample_y) >= center {
                    code |= 1 << n;
                }
            }
            let value = f64::from(code);
            sum += value;
            sum_sq += value * value;
            count += 1;
        }
    }

    let n = count as f64;
    let mean = sum / n;
    let variance = (sum_sq / n - mean * mean).max(0.0);
    Ok((mean, variance.sqrt()))
}

/// Bilinear sample at fractional coordinates, clamped to the image bounds.
fn bilinear(img: &GrayImage, x: f64, y: f64) -> f64 {
    let (width, height) = img.dimensions();
    let max_x = (width - 1) as i64;
    let max_y = (height - 1) as i64;

    let x0 = (x.floor() as i64).clamp(0, max_x);
    let y0 = (y.floor() as i64).clamp(0, max_y);
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);
    let fx = (x - x0 as f64).clamp(0.0, 1.0);
    let fy = (y - y0 as f64).clamp(0.0, 1.0);

    let at = |px: i64, py: i64| f64::from(img.get_pixel(px as u32, py as u32).0[0]);

    let top = at(x0, y0) * (1.0 - fx) + at(x1, y0) * fx;
    let bottom = at(x0, y1) * (1.0 - fx) + at(x1, y1) * fx;
    top * (1.0 - fy) + bottom * fy
}

/// Contrast and homogeneity from the horizontal distance-1 co-occurrence
/// matrix, quantized to `levels` gray levels and normalized to a probability
/// distribution.
fn cooccurrence_stats(img: &GrayImage, levels: u32) -> Result<(f64, f64)> {
    let (width, height) = img.dimensions();
    if width < 2 {
        return Err(WeftmarkError::analysis(
            FeatureCategory::Texture,
            "image too narrow for horizontal co-occurrence pairs",
        ));
    }

    let levels = levels.max(1) as usize;
    let divisor = (MAX_INTENSITY_LEVELS / levels).max(1);
    let mut counts = vec![0u64; levels * levels];

    for y in 0..height {
        for x in 0..width - 1 {
            let i = (img.get_pixel(x, y).0[0] as usize / divisor).min(levels - 1);
            let j = (img.get_pixel(x + 1, y).0[0] as usize / divisor).min(levels - 1);
            counts[i * levels + j] += 1;
        }
    }

    let total = (u64::from(width - 1) * u64::from(height)) as f64;
    let mut contrast = 0.0;
    let mut homogeneity = 0.0;
    for i in 0..levels {
        for j in 0..levels {
            let p = counts[i * levels + j] as f64 / total;
            if p == 0.0 {
                continue;
            }
            let delta = i as f64 - j as f64;
            contrast += p * delta * delta;
            homogeneity += p / (1.0 + delta * delta);
        }
    }

    Ok((contrast, homogeneity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn flat(width: u32, height: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([value]))
    }

    /// Deterministic speckle, no external randomness.
    fn speckle(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            Luma([(x.wrapping_mul(31).wrapping_add(y.wrapping_mul(57)) % 251) as u8])
        })
    }

    #[test]
    fn flat_image_yields_saturated_codes_and_unit_homogeneity() {
        let config = ExtractionConfig::default();
        let texture = analyze(&flat(16, 16, 120), &config).unwrap();
        // Every neighbor equals the center, so every bit is set.
        assert_eq!(texture.mean_intensity, 255.0);
        assert_eq!(texture.std_deviation, 0.0);
        // A single occupied co-occurrence cell on the diagonal.
        assert_eq!(texture.contrast, 0.0);
        assert!((texture.homogeneity - 1.0).abs() < 1e-12);
    }

    #[test]
    fn speckle_has_positive_contrast_and_spread() {
        let config = ExtractionConfig::default();
        let texture = analyze(&speckle(32, 32), &config).unwrap();
        assert!(texture.contrast > 0.0);
        assert!(texture.std_deviation > 0.0);
        assert!(texture.homogeneity > 0.0 && texture.homogeneity < 1.0);
    }

    #[test]
    fn analysis_is_deterministic() {
        let config = ExtractionConfig::default();
        let img = speckle(24, 18);
        assert_eq!(analyze(&img, &config).unwrap(), analyze(&img, &config).unwrap());
    }

    #[test]
    fn undersized_image_fails_analysis() {
        let config = ExtractionConfig::default();
        let err = analyze(&flat(2, 2, 0), &config).unwrap_err();
        assert!(matches!(
            err,
            WeftmarkError::Analysis {
                category: FeatureCategory::Texture,
                ..
            }
        ));
    }

    #[test]
    fn bilinear_interpolates_between_pixels() {
        let mut img = flat(2, 1, 0);
        img.put_pixel(1, 0, Luma([100]));
        assert_eq!(bilinear(&img, 0.5, 0.0), 50.0);
        assert_eq!(bilinear(&img, 0.0, 0.0), 0.0);
        assert_eq!(bilinear(&img, 1.0, 0.0), 100.0);
    }

    #[test]
    fn vertical_stripes_maximize_contrast_terms() {
        // Alternating 0/255 columns: every horizontal pair spans the full
        // quantized range.
        let img = GrayImage::from_fn(16, 8, |x, _| Luma([if x % 2 == 0 { 0 } else { 255 }]));
        let config = ExtractionConfig::default();
        let texture = analyze(&img, &config).unwrap();
        let max_delta = (config.cooccurrence_levels - 1) as f64;
        assert!((texture.contrast - max_delta * max_delta).abs() < 1e-9);
    }
}
