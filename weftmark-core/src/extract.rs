//! Descriptor extraction pipeline.
//!
//! Runs the four independent analyzers over one preprocessed image, then the
//! pattern scorer once texture and dimension results are in. Texture, edge
//! and histogram analysis degrade to all-zero output on internal failure
//! instead of aborting the extraction; every degraded category is reported to
//! the caller, since a silently zeroed sub-descriptor would bias later
//! similarity scoring. Geometry failures are fatal: a degenerate frame has no
//! meaningful descriptors at all.

use std::path::Path;
use std::thread;

use chrono::Utc;
use tracing::{info, warn};

use crate::analysis::{dimensions, edge, histogram, pattern, texture};
use crate::config::ExtractionConfig;
use crate::descriptor::{
    DescriptorSet, EdgeDescriptor, FeatureCategory, SymmetrySource, TextureDescriptor,
};
use crate::error::{Result, WeftmarkError};
use crate::preprocess::{self, PreprocessedImage};

/// Result of one extraction: the descriptor set plus the degradation report.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub descriptors: DescriptorSet,
    /// Categories that fell back to all-zero output.
    pub degraded: Vec<FeatureCategory>,
    /// Which symmetry definition produced the pattern score.
    pub symmetry_source: SymmetrySource,
}

impl Extraction {
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// Descriptor extractor bound to one pinned configuration.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: ExtractionConfig,
}

impl FeatureExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract descriptors from an image file.
    pub fn extract_path(&self, path: &Path) -> Result<Extraction> {
        let pre = preprocess::load_path(path, &self.config)?;
        info!(path = %path.display(), "Decoded image for extraction");
        self.extract(&pre)
    }

    /// Extract descriptors from raw image bytes.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<Extraction> {
        let pre = preprocess::load_bytes(bytes, &self.config)?;
        self.extract(&pre)
    }

    fn extract(&self, pre: &PreprocessedImage) -> Result<Extraction> {
        let dims = dimensions::analyze(pre.width(), pre.height())?;

        // Texture, edge and histogram have no data dependency on each other;
        // fan out and join. Histogram runs on the current thread.
        let (texture_result, edge_result, histogram_result) = thread::scope(|scope| {
            let texture_handle = scope.spawn(|| texture::analyze(&pre.smoothed, &self.config));
            let edge_handle = scope.spawn(|| edge::analyze(&pre.smoothed, &self.config));
            let histogram_result = histogram::analyze(&pre.color, &self.config);
            (
                join_analyzer(texture_handle, FeatureCategory::Texture),
                join_analyzer(edge_handle, FeatureCategory::Edge),
                histogram_result,
            )
        });

        let mut degraded = Vec::new();
        let texture_out = or_degrade(
            texture_result,
            FeatureCategory::Texture,
            TextureDescriptor::zeroed(),
            &mut degraded,
        );
        let edge_out = or_degrade(
            edge_result,
            FeatureCategory::Edge,
            EdgeDescriptor::zeroed(),
            &mut degraded,
        );
        let histogram_out = or_degrade(
            histogram_result,
            FeatureCategory::Histogram,
            vec![0.0; self.config.histogram_bins * histogram::CHANNEL_ORDER.len()],
            &mut degraded,
        );

        // Fan-in join: pattern needs texture and dimensions.
        let (pattern_out, symmetry_source) = pattern::score(&texture_out, &dims, &pre.smoothed);

        let descriptors = DescriptorSet::new(
            texture_out,
            histogram_out,
            dims,
            edge_out,
            pattern_out,
            Utc::now(),
        );

        Ok(Extraction {
            descriptors,
            degraded,
            symmetry_source,
        })
    }
}

fn join_analyzer<T>(
    handle: thread::ScopedJoinHandle<'_, Result<T>>,
    category: FeatureCategory,
) -> Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(WeftmarkError::analysis(category, "analyzer thread panicked")))
}

fn or_degrade<T>(
    result: Result<T>,
    category: FeatureCategory,
    zero: T,
    degraded: &mut Vec<FeatureCategory>,
) -> T {
    match result {
        Ok(value) => value,
        Err(error) => {
            warn!(%category, %error, "Analyzer degraded to all-zero output");
            degraded.push(category);
            zero
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{KEY_HEIGHT, KEY_MEAN_INTENSITY, KEY_WIDTH};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(img: RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn woven_sample(width: u32, height: u32) -> Vec<u8> {
        png_bytes(RgbImage::from_fn(width, height, |x, y| {
            let weave = ((x * 13 + y * 7) % 97) as u8;
            Rgb([weave, weave.wrapping_add(40), weave.wrapping_add(80)])
        }))
    }

    #[test]
    fn extraction_populates_all_categories() {
        let extractor = FeatureExtractor::default();
        let extraction = extractor.extract_bytes(&woven_sample(32, 24)).unwrap();
        let set = &extraction.descriptors;
        assert_eq!(set.texture().len(), 4);
        assert_eq!(set.dimensions().len(), 4);
        assert_eq!(set.pattern().len(), 2);
        assert_eq!(set.edge().len(), 2);
        assert_eq!(
            set.histogram().len(),
            extractor.config().histogram_bins * histogram::CHANNEL_ORDER.len()
        );
        assert_eq!(set.dimension_value(KEY_WIDTH).unwrap(), 32.0);
        assert_eq!(set.dimension_value(KEY_HEIGHT).unwrap(), 24.0);
        assert!(extraction.degraded.is_empty());
        assert_eq!(extraction.symmetry_source, SymmetrySource::PixelMirror);
    }

    #[test]
    fn tiny_image_degrades_texture_and_edge_but_not_histogram() {
        let extractor = FeatureExtractor::default();
        let extraction = extractor
            .extract_bytes(&png_bytes(RgbImage::from_pixel(2, 2, Rgb([9, 9, 9]))))
            .unwrap();
        assert!(extraction.degraded.contains(&FeatureCategory::Texture));
        assert!(extraction.degraded.contains(&FeatureCategory::Edge));
        assert!(!extraction.degraded.contains(&FeatureCategory::Histogram));
        assert_eq!(
            extraction
                .descriptors
                .texture_value(KEY_MEAN_INTENSITY)
                .unwrap(),
            0.0
        );
        assert!(extraction.is_degraded());
    }

    #[test]
    fn decode_failure_aborts_extraction() {
        let extractor = FeatureExtractor::default();
        assert!(matches!(
            extractor.extract_bytes(b"not an image").unwrap_err(),
            WeftmarkError::Decode(_)
        ));
    }

    #[test]
    fn repeated_extraction_yields_identical_descriptors() {
        let extractor = FeatureExtractor::default();
        let bytes = woven_sample(40, 30);
        let first = extractor.extract_bytes(&bytes).unwrap();
        let second = extractor.extract_bytes(&bytes).unwrap();
        assert_eq!(first.descriptors.texture(), second.descriptors.texture());
        assert_eq!(first.descriptors.histogram(), second.descriptors.histogram());
        assert_eq!(first.descriptors.edge(), second.descriptors.edge());
        assert_eq!(first.descriptors.pattern(), second.descriptors.pattern());
    }
}
