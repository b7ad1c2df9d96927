//! Pinned extraction and comparison parameters.
//!
//! Every value here participates in the canonical descriptor format: changing
//! any of them changes extracted values, and therefore the feature hash, for
//! all images processed afterwards. [`ALGORITHM_VERSION`] is stamped into each
//! stored identity record so that records produced under older parameter sets
//! remain identifiable and verifiable.

use crate::hash::HashAlgorithm;

/// Version tag for the parameter set and canonical encoding below.
///
/// Bump whenever any default in [`ExtractionConfig`] or the canonical
/// serialization changes.
pub const ALGORITHM_VERSION: &str = "wm-1";

/// Relative weights of the per-category similarities in the total score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityWeights {
    pub texture: f64,
    pub pattern: f64,
    pub dimensions: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            texture: 0.4,
            pattern: 0.4,
            dimensions: 0.2,
        }
    }
}

/// Immutable parameter set threaded through extraction, canonicalization and
/// comparison.
///
/// Registration and verification of the same item must run with an identical
/// configuration; a divergence does not fail loudly but silently degrades
/// matching accuracy.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Gaussian smoothing strength applied to the grayscale image before any
    /// texture, edge or pattern analysis.
    pub smoothing_sigma: f32,
    /// Sampling radius of the local neighborhood transform.
    pub lbp_radius: f64,
    /// Number of neighbors sampled per pixel, enumerated in fixed angular
    /// order.
    pub lbp_neighbors: u32,
    /// Gray-level count for the co-occurrence quantization.
    pub cooccurrence_levels: u32,
    /// Lower hysteresis threshold of the edge detector.
    pub edge_low_threshold: f64,
    /// Upper hysteresis threshold of the edge detector.
    pub edge_high_threshold: f64,
    /// Minimum gradient magnitude for a pixel to participate in the mean
    /// orientation; weaker gradients are noise, not edges.
    pub orientation_min_magnitude: f64,
    /// Bins per color channel in the intensity histogram.
    pub histogram_bins: usize,
    /// Decimal digits kept by canonical rounding.
    pub precision: u32,
    /// Per-category weights of the similarity engine.
    pub weights: SimilarityWeights,
    /// Minimum total similarity for a candidate to be accepted as authentic.
    pub authenticity_threshold: f64,
    /// Digest used for feature and combined hashes.
    pub hash_algorithm: HashAlgorithm,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            smoothing_sigma: 1.0,
            lbp_radius: 1.0,
            lbp_neighbors: 8,
            cooccurrence_levels: 8,
            edge_low_threshold: 50.0,
            edge_high_threshold: 150.0,
            orientation_min_magnitude: 10.0,
            histogram_bins: 256,
            precision: 4,
            weights: SimilarityWeights::default(),
            authenticity_threshold: 0.80,
            hash_algorithm: HashAlgorithm::Sha3_256,
        }
    }
}
