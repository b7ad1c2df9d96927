//! Pattern scoring: complexity and symmetry, derived after texture and
//! dimension analysis.

use image::GrayImage;
use tracing::warn;

use crate::descriptor::{
    DimensionDescriptor, PatternDescriptor, SymmetrySource, TextureDescriptor,
};

const MAX_INTENSITY: f64 = 255.0;
const SYMMETRY_SCALE: f64 = 100.0;

/// Complexity is the midpoint of the texture spread measures.
pub fn complexity(texture: &TextureDescriptor) -> f64 {
    (texture.std_deviation + texture.contrast) / 2.0
}

/// Pixel-mirror symmetry of the smoothed grayscale image, in [0, 100].
///
/// Compares the left half against the horizontally mirrored right half,
/// accumulating `1 − |left − right| / 255` per pair. Returns `None` when the
/// image is too narrow to form any pair.
pub fn mirror_symmetry(smoothed: &GrayImage) -> Option<f64> {
    let (width, height) = smoothed.dimensions();
    let half = width / 2;
    if half == 0 || height == 0 {
        return None;
    }

    let mut acc = 0.0;
    for y in 0..height {
        for x in 0..half {
            let left = f64::from(smoothed.get_pixel(x, y).0[0]);
            let right = f64::from(smoothed.get_pixel(width - 1 - x, y).0[0]);
            acc += 1.0 - (left - right).abs() / MAX_INTENSITY;
        }
    }

    let pairs = f64::from(half) * f64::from(height);
    Some(acc / pairs * SYMMETRY_SCALE)
}

/// Aspect-ratio stand-in for the symmetry score, in [0, 100].
///
/// Lower fidelity than [`mirror_symmetry`]: it sees only the frame geometry,
/// not the weave. Callers must surface [`SymmetrySource::AspectRatioFallback`]
/// whenever this path is taken.
pub fn aspect_ratio_symmetry(aspect_ratio: f64) -> f64 {
    ((1.0 - aspect_ratio).abs() * SYMMETRY_SCALE).min(SYMMETRY_SCALE)
}

/// Derive the pattern descriptor from the texture output and the smoothed
/// image, reporting which symmetry definition was used.
pub fn score(
    texture: &TextureDescriptor,
    dimensions: &DimensionDescriptor,
    smoothed: &GrayImage,
) -> (PatternDescriptor, SymmetrySource) {
    let (symmetry_score, source) = match mirror_symmetry(smoothed) {
        Some(score) => (score, SymmetrySource::PixelMirror),
        None => {
            warn!(
                width = smoothed.width(),
                "Image too narrow for mirror symmetry, using aspect-ratio fallback"
            );
            (
                aspect_ratio_symmetry(dimensions.aspect_ratio),
                SymmetrySource::AspectRatioFallback,
            )
        }
    };

    (
        PatternDescriptor {
            complexity_score: complexity(texture),
            symmetry_score,
        },
        source,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dimensions;
    use image::Luma;

    #[test]
    fn complexity_is_the_midpoint() {
        let texture = TextureDescriptor {
            mean_intensity: 0.0,
            std_deviation: 10.0,
            contrast: 0.5,
            homogeneity: 0.0,
        };
        assert_eq!(complexity(&texture), 5.25);
    }

    #[test]
    fn perfectly_mirrored_image_scores_full() {
        let img = GrayImage::from_fn(10, 4, |x, _| {
            let folded = if x < 5 { x } else { 9 - x };
            Luma([(folded * 40) as u8])
        });
        assert_eq!(mirror_symmetry(&img), Some(100.0));
    }

    #[test]
    fn half_black_half_white_scores_zero() {
        let img = GrayImage::from_fn(8, 8, |x, _| Luma([if x < 4 { 0 } else { 255 }]));
        assert_eq!(mirror_symmetry(&img), Some(0.0));
    }

    #[test]
    fn one_column_image_has_no_pairs() {
        let img = GrayImage::from_pixel(1, 6, Luma([42]));
        assert_eq!(mirror_symmetry(&img), None);
    }

    #[test]
    fn aspect_fallback_is_capped() {
        assert_eq!(aspect_ratio_symmetry(1.0), 0.0);
        assert_eq!(aspect_ratio_symmetry(0.5), 50.0);
        assert_eq!(aspect_ratio_symmetry(3.0), 100.0);
    }

    #[test]
    fn score_reports_the_symmetry_source() {
        let texture = TextureDescriptor::default();
        let wide = GrayImage::from_pixel(8, 8, Luma([0]));
        let dims = dimensions::analyze(8, 8).unwrap();
        let (_, source) = score(&texture, &dims, &wide);
        assert_eq!(source, SymmetrySource::PixelMirror);

        let narrow = GrayImage::from_pixel(1, 8, Luma([0]));
        let narrow_dims = dimensions::analyze(1, 8).unwrap();
        let (pattern, source) = score(&texture, &narrow_dims, &narrow);
        assert_eq!(source, SymmetrySource::AspectRatioFallback);
        assert_eq!(pattern.symmetry_score, aspect_ratio_symmetry(0.125));
    }
}
