//! Image decoding and preprocessing.
//!
//! Produces the three raster views the analyzers consume: the raw grayscale
//! matrix, a Gaussian-smoothed grayscale matrix and the RGB color matrix.
//! Registration and verification must run with identical smoothing
//! parameters, so the smoothing strength lives in [`ExtractionConfig`]
//! alongside every other pinned constant. No resizing is performed.

use std::path::Path;

use image::{imageops, DynamicImage, GrayImage, RgbImage};
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::error::{Result, WeftmarkError};

/// Decoded and smoothed raster views of one photograph.
#[derive(Debug, Clone)]
pub struct PreprocessedImage {
    /// Grayscale conversion of the decoded image.
    pub gray: GrayImage,
    /// Grayscale after Gaussian smoothing; input to texture, edge and
    /// symmetry analysis.
    pub smoothed: GrayImage,
    /// RGB conversion; input to the histogram builder.
    pub color: RgbImage,
}

impl PreprocessedImage {
    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }
}

/// Decode and preprocess an image file.
pub fn load_path(path: &Path, config: &ExtractionConfig) -> Result<PreprocessedImage> {
    let decoded = image::open(path)
        .map_err(|e| WeftmarkError::Decode(format!("{}: {e}", path.display())))?;
    preprocess(decoded, config)
}

/// Decode and preprocess raw image bytes.
pub fn load_bytes(bytes: &[u8], config: &ExtractionConfig) -> Result<PreprocessedImage> {
    if bytes.is_empty() {
        return Err(WeftmarkError::Decode("empty input".into()));
    }
    let decoded =
        image::load_from_memory(bytes).map_err(|e| WeftmarkError::Decode(e.to_string()))?;
    preprocess(decoded, config)
}

fn preprocess(decoded: DynamicImage, config: &ExtractionConfig) -> Result<PreprocessedImage> {
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(WeftmarkError::Decode(format!(
            "decoded image is empty ({width}x{height})"
        )));
    }

    let gray = decoded.to_luma8();
    let smoothed = imageops::blur(&gray, config.smoothing_sigma);
    let color = decoded.to_rgb8();

    debug!(width, height, sigma = config.smoothing_sigma, "Preprocessed image");

    Ok(PreprocessedImage {
        gray,
        smoothed,
        color,
    })
}
