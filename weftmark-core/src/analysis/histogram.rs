//! Per-channel intensity histogram, concatenated in pinned channel order.

use image::RgbImage;

use crate::config::ExtractionConfig;
use crate::descriptor::FeatureCategory;
use crate::error::{Result, WeftmarkError};

/// Pinned channel order of the concatenated histogram.
///
/// This order is part of the canonical descriptor format; changing it changes
/// every feature hash computed afterwards.
pub const CHANNEL_ORDER: [&str; 3] = ["red", "green", "blue"];

const INTENSITY_RANGE: usize = 256;

/// Build the concatenated per-channel histogram of the color image.
///
/// Each channel is histogrammed over the full intensity range with the
/// configured bin count, min-max normalized to [0, 1] independently, then the
/// channels are concatenated in [`CHANNEL_ORDER`]. Output length is
/// `bins × 3`.
pub fn analyze(color: &RgbImage, config: &ExtractionConfig) -> Result<Vec<f64>> {
    let bins = config.histogram_bins;
    if bins == 0 || bins > INTENSITY_RANGE {
        return Err(WeftmarkError::analysis(
            FeatureCategory::Histogram,
            format!("unusable bin count {bins}"),
        ));
    }

    let mut concatenated = Vec::with_capacity(bins * CHANNEL_ORDER.len());
    for channel in 0..CHANNEL_ORDER.len() {
        let mut counts = vec![0.0f64; bins];
        for pixel in color.pixels() {
            let intensity = pixel.0[channel] as usize;
            counts[intensity * bins / INTENSITY_RANGE] += 1.0;
        }
        concatenated.extend(min_max_normalize(&counts));
    }

    Ok(concatenated)
}

/// Min-max normalization to [0, 1]. A flat histogram (max == min) normalizes
/// to all zeros.
fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > min {
        let span = max - min;
        values.iter().map(|v| (v - min) / span).collect()
    } else {
        vec![0.0; values.len()]
    }
}
