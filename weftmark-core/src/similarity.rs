//! Weighted similarity scoring between two descriptor sets.
//!
//! Pure function of (reference, candidate): no state, no I/O. Required keys
//! are looked up strictly; a descriptor set missing one fails with
//! [`WeftmarkError::MissingFeature`] instead of defaulting to zero, which
//! would bias the averaged score unpredictably.

use serde::Serialize;

use crate::config::ExtractionConfig;
use crate::descriptor::{
    DescriptorSet, KEY_ASPECT_RATIO, KEY_AREA, KEY_COMPLEXITY, KEY_CONTRAST, KEY_HOMOGENEITY,
    KEY_MEAN_INTENSITY, KEY_SYMMETRY,
};
use crate::error::{Result, WeftmarkError};

const MAX_INTENSITY: f64 = 255.0;
const PATTERN_SCALE: f64 = 100.0;

/// Per-category and total similarity of a candidate against a reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityReport {
    pub texture_sim: f64,
    pub pattern_sim: f64,
    pub dimension_sim: f64,
    pub total: f64,
    pub authentic: bool,
}

/// Score a candidate descriptor set against a reference.
pub fn compare(
    reference: &DescriptorSet,
    candidate: &DescriptorSet,
    config: &ExtractionConfig,
) -> Result<SimilarityReport> {
    let texture_sim = clamp_unit(texture_similarity(reference, candidate)?);
    let pattern_sim = clamp_unit(pattern_similarity(reference, candidate)?);
    let dimension_sim = clamp_unit(dimension_similarity(reference, candidate)?);

    let weights = &config.weights;
    let total = weights.texture * texture_sim
        + weights.pattern * pattern_sim
        + weights.dimensions * dimension_sim;

    Ok(SimilarityReport {
        texture_sim,
        pattern_sim,
        dimension_sim,
        total,
        authentic: total >= config.authenticity_threshold,
    })
}

fn texture_similarity(reference: &DescriptorSet, candidate: &DescriptorSet) -> Result<f64> {
    let mean_delta = (reference.texture_value(KEY_MEAN_INTENSITY)?
        - candidate.texture_value(KEY_MEAN_INTENSITY)?)
        .abs()
        / MAX_INTENSITY;
    let contrast_delta =
        (reference.texture_value(KEY_CONTRAST)? - candidate.texture_value(KEY_CONTRAST)?).abs();
    let homogeneity_delta = (reference.texture_value(KEY_HOMOGENEITY)?
        - candidate.texture_value(KEY_HOMOGENEITY)?)
        .abs();

    Ok(1.0 - (mean_delta + contrast_delta + homogeneity_delta) / 3.0)
}

fn pattern_similarity(reference: &DescriptorSet, candidate: &DescriptorSet) -> Result<f64> {
    let complexity_delta = (reference.pattern_value(KEY_COMPLEXITY)?
        - candidate.pattern_value(KEY_COMPLEXITY)?)
        .abs()
        / PATTERN_SCALE;
    let symmetry_delta = (reference.pattern_value(KEY_SYMMETRY)?
        - candidate.pattern_value(KEY_SYMMETRY)?)
        .abs()
        / PATTERN_SCALE;

    Ok(1.0 - (complexity_delta + symmetry_delta) / 2.0)
}

fn dimension_similarity(reference: &DescriptorSet, candidate: &DescriptorSet) -> Result<f64> {
    let reference_area = reference.dimension_value(KEY_AREA)?;
    if reference_area == 0.0 {
        return Err(WeftmarkError::Geometry(
            "reference area is zero, cannot normalize area delta".into(),
        ));
    }

    let aspect_delta = (reference.dimension_value(KEY_ASPECT_RATIO)?
        - candidate.dimension_value(KEY_ASPECT_RATIO)?)
        .abs();
    let area_delta =
        (reference.dimension_value(KEY_AREA)? - candidate.dimension_value(KEY_AREA)?).abs()
            / reference_area;

    Ok(1.0 - (aspect_delta + area_delta) / 2.0)
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
