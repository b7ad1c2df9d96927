//! Edge analysis: Canny-style edge density and circular-mean orientation.

use image::GrayImage;

use crate::config::ExtractionConfig;
use crate::descriptor::{EdgeDescriptor, FeatureCategory};
use crate::error::{Result, WeftmarkError};

const SOBEL_X: [[f64; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f64; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Per-pixel Sobel gradients with replicated borders.
struct GradientField {
    gx: Vec<f64>,
    gy: Vec<f64>,
    magnitude: Vec<f64>,
    width: usize,
    height: usize,
}

/// Compute the edge descriptor of the smoothed grayscale image.
///
/// Density is the fraction of pixels surviving non-maximum suppression and
/// double-threshold hysteresis, already in [0, 1]. Orientation is the
/// circular mean of gradient angles over pixels whose magnitude exceeds the
/// configured floor, folded into [0, 180) degrees and normalized to [0, 1].
pub fn analyze(smoothed: &GrayImage, config: &ExtractionConfig) -> Result<EdgeDescriptor> {
    let (width, height) = smoothed.dimensions();
    if width < 3 || height < 3 {
        return Err(WeftmarkError::analysis(
            FeatureCategory::Edge,
            format!("image {width}x{height} too small for gradient analysis"),
        ));
    }

    let gradients = sobel(smoothed);
    let density = edge_density(
        &gradients,
        config.edge_low_threshold,
        config.edge_high_threshold,
    );
    let orientation = mean_orientation(&gradients, config.orientation_min_magnitude);

    Ok(EdgeDescriptor {
        density,
        orientation,
    })
}

fn sobel(img: &GrayImage) -> GradientField {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let mut gx = vec![0.0; width * height];
    let mut gy = vec![0.0; width * height];
    let mut magnitude = vec![0.0; width * height];

    for y in 0..height {
        let ys = [y.saturating_sub(1), y, (y + 1).min(height - 1)];
        for x in 0..width {
            let xs = [x.saturating_sub(1), x, (x + 1).min(width - 1)];
            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, &yy) in ys.iter().enumerate() {
                for (kx, &xx) in xs.iter().enumerate() {
                    let sample = f64::from(img.get_pixel(xx as u32, yy as u32).0[0]);
                    sum_x += sample * SOBEL_X[ky][kx];
                    sum_y += sample * SOBEL_Y[ky][kx];
                }
            }
            let idx = y * width + x;
            gx[idx] = sum_x;
            gy[idx] = sum_y;
            magnitude[idx] = (sum_x * sum_x + sum_y * sum_y).sqrt();
        }
    }

    GradientField {
        gx,
        gy,
        magnitude,
        width,
        height,
    }
}

/// Fraction of pixels classified as edges, in [0, 1].
fn edge_density(gradients: &GradientField, low: f64, high: f64) -> f64 {
    let thinned = non_maximum_suppression(gradients);
    let total = gradients.width * gradients.height;

    // 0 = suppressed, 1 = weak, 2 = strong
    let mut class = vec![0u8; total];
    let mut pending: Vec<usize> = Vec::new();
    for (idx, &mag) in thinned.iter().enumerate() {
        if mag >= high {
            class[idx] = 2;
            pending.push(idx);
        } else if mag >= low {
            class[idx] = 1;
        }
    }

    // Hysteresis: weak edges survive only when 8-connected to a strong edge.
    // Row-major seeding keeps the traversal order, and hence the result,
    // deterministic.
    let width = gradients.width as i64;
    let height = gradients.height as i64;
    let mut edge_count = 0u64;
    while let Some(idx) = pending.pop() {
        edge_count += 1;
        let x = (idx as i64) % width;
        let y = (idx as i64) / width;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 || nx >= width || ny >= height {
                    continue;
                }
                let nidx = (ny * width + nx) as usize;
                if class[nidx] == 1 {
                    class[nidx] = 2;
                    pending.push(nidx);
                }
            }
        }
    }

    edge_count as f64 / total as f64
}

/// Suppress gradient magnitudes that are not local maxima along the gradient
/// direction, quantized to four sectors. Border pixels are suppressed.
fn non_maximum_suppression(gradients: &GradientField) -> Vec<f64> {
    let width = gradients.width;
    let height = gradients.height;
    let mut out = vec![0.0; width * height];

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let idx = y * width + x;
            let mag = gradients.magnitude[idx];
            if mag == 0.0 {
                continue;
            }
            let angle = gradients.gy[idx]
                .atan2(gradients.gx[idx])
                .to_degrees()
                .rem_euclid(180.0);
            let (da, db) = if !(22.5..157.5).contains(&angle) {
                ((1i64, 0i64), (-1i64, 0i64))
            } else if angle < 67.5 {
                ((1, 1), (-1, -1))
            } else if angle < 112.5 {
                ((0, 1), (0, -1))
            } else {
                ((1, -1), (-1, 1))
            };
            let a = gradients.magnitude[((y as i64 + da.1) as usize) * width
                + (x as i64 + da.0) as usize];
            let b = gradients.magnitude[((y as i64 + db.1) as usize) * width
                + (x as i64 + db.0) as usize];
            if mag >= a && mag >= b {
                out[idx] = mag;
            }
        }
    }

    out
}

/// Circular mean of gradient angles over sufficiently strong pixels.
///
/// Weak-gradient pixels are excluded entirely; averaging them in would drown
/// the orientation signal in noise. Returns 0.0 when no pixel qualifies.
fn mean_orientation(gradients: &GradientField, min_magnitude: f64) -> f64 {
    let mut sum_sin = 0.0;
    let mut sum_cos = 0.0;
    let mut count = 0u64;

    for idx in 0..gradients.magnitude.len() {
        if gradients.magnitude[idx] > min_magnitude {
            let angle = gradients.gy[idx].atan2(gradients.gx[idx]);
            sum_sin += angle.sin();
            sum_cos += angle.cos();
            count += 1;
        }
    }

    if count == 0 {
        return 0.0;
    }

    let mean = sum_sin.atan2(sum_cos);
    let folded = mean.to_degrees().rem_euclid(180.0);
    folded / 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn flat(width: u32, height: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([value]))
    }

    /// Sharp vertical step edge down the middle.
    fn vertical_step(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| {
            Luma([if x < width / 2 { 0 } else { 255 }])
        })
    }

    #[test]
    fn flat_image_has_no_edges() {
        let config = ExtractionConfig::default();
        let edge = analyze(&flat(16, 16, 200), &config).unwrap();
        assert_eq!(edge.density, 0.0);
        assert_eq!(edge.orientation, 0.0);
    }

    #[test]
    fn step_edge_is_detected_with_horizontal_orientation() {
        let config = ExtractionConfig::default();
        let edge = analyze(&vertical_step(32, 32), &config).unwrap();
        assert!(edge.density > 0.0);
        // A vertical edge has a horizontal gradient: angle 0 degrees.
        assert!(edge.orientation < 1e-9);
    }

    #[test]
    fn horizontal_step_folds_to_ninety_degrees() {
        let config = ExtractionConfig::default();
        let img = GrayImage::from_fn(32, 32, |_, y| Luma([if y < 16 { 0 } else { 255 }]));
        let edge = analyze(&img, &config).unwrap();
        // Gradient points along +y: 90 degrees, normalized to 0.5.
        assert!((edge.orientation - 0.5).abs() < 1e-9);
    }

    #[test]
    fn density_is_bounded() {
        let config = ExtractionConfig::default();
        let img = GrayImage::from_fn(24, 24, |x, y| {
            Luma([if (x / 4 + y / 4) % 2 == 0 { 0 } else { 255 }])
        });
        let edge = analyze(&img, &config).unwrap();
        assert!(edge.density > 0.0 && edge.density <= 1.0);
    }

    #[test]
    fn tiny_image_fails_analysis() {
        let config = ExtractionConfig::default();
        let err = analyze(&flat(2, 2, 0), &config).unwrap_err();
        assert!(matches!(
            err,
            WeftmarkError::Analysis {
                category: FeatureCategory::Edge,
                ..
            }
        ));
    }

    #[test]
    fn analysis_is_deterministic() {
        let config = ExtractionConfig::default();
        let img = vertical_step(20, 14);
        assert_eq!(analyze(&img, &config).unwrap(), analyze(&img, &config).unwrap());
    }
}
