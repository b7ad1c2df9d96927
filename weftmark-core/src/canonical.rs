//! Canonicalization: the deterministically ordered, rounded projection of a
//! descriptor set used for hashing.
//!
//! Canonicalization is total and idempotent. Every real value is sanitized
//! (NaN becomes 0.0, +∞ becomes 1.0, −∞ becomes 0.0) and then rounded
//! half-up at the configured precision; rounding an already-rounded value is
//! a no-op, so re-canonicalizing a canonical value returns it unchanged.
//! Mapping-typed categories are keyed by `BTreeMap`, so key order is always
//! ascending regardless of how the source maps were populated; sequences keep
//! their generation order. `capture_time` never enters the projection.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ExtractionConfig;
use crate::descriptor::DescriptorSet;
use crate::error::{Result, WeftmarkError};

/// Order-normalized, rounded projection of a [`DescriptorSet`].
///
/// Fields are declared in ascending name order; together with compact JSON
/// serialization and `BTreeMap` key order this fixes the canonical byte
/// encoding completely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalDescriptor {
    dimensions: BTreeMap<String, f64>,
    edge: Vec<f64>,
    histogram: Vec<f64>,
    pattern: BTreeMap<String, f64>,
    texture: BTreeMap<String, f64>,
}

impl CanonicalDescriptor {
    pub fn dimensions(&self) -> &BTreeMap<String, f64> {
        &self.dimensions
    }

    pub fn edge(&self) -> &[f64] {
        &self.edge
    }

    pub fn histogram(&self) -> &[f64] {
        &self.histogram
    }

    pub fn pattern(&self) -> &BTreeMap<String, f64> {
        &self.pattern
    }

    pub fn texture(&self) -> &BTreeMap<String, f64> {
        &self.texture
    }

    /// Serialize to the canonical byte encoding: compact JSON, UTF-8, field
    /// and key order fixed by construction.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| WeftmarkError::Serialization(e.to_string()))
    }

    /// Rebuild a descriptor set holding these canonical values.
    ///
    /// Persisted feature records go through this, so a loaded record
    /// re-canonicalizes to a no-op and reproduces its original hash.
    pub fn with_capture_time(&self, capture_time: DateTime<Utc>) -> DescriptorSet {
        DescriptorSet::from_parts(
            self.texture.clone(),
            self.histogram.clone(),
            self.dimensions.clone(),
            self.edge.clone(),
            self.pattern.clone(),
            capture_time,
        )
    }
}

/// Project a descriptor set onto its canonical value.
pub fn canonicalize(set: &DescriptorSet, config: &ExtractionConfig) -> CanonicalDescriptor {
    let precision = config.precision;
    CanonicalDescriptor {
        dimensions: canonical_map(set.dimensions(), precision),
        edge: canonical_seq(set.edge(), precision),
        histogram: canonical_seq(set.histogram(), precision),
        pattern: canonical_map(set.pattern(), precision),
        texture: canonical_map(set.texture(), precision),
    }
}

fn canonical_map(map: &BTreeMap<String, f64>, precision: u32) -> BTreeMap<String, f64> {
    map.iter()
        .map(|(k, &v)| (k.clone(), canonical_value(v, precision)))
        .collect()
}

fn canonical_seq(seq: &[f64], precision: u32) -> Vec<f64> {
    seq.iter().map(|&v| canonical_value(v, precision)).collect()
}

fn canonical_value(value: f64, precision: u32) -> f64 {
    round_half_up(sanitize(value), precision)
}

/// Replace non-finite values before rounding or hashing.
pub(crate) fn sanitize(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else if value == f64::INFINITY {
        1.0
    } else if value == f64::NEG_INFINITY {
        0.0
    } else {
        value
    }
}

/// Round half-up at `precision` decimal digits.
///
/// Stable under re-rounding: applying it to an already-rounded value at the
/// same precision returns the value unchanged.
pub(crate) fn round_half_up(value: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision as i32);
    let rounded = (value * scale + 0.5).floor() / scale;
    // Squash negative zero so the canonical encoding never emits "-0.0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{
        DimensionDescriptor, EdgeDescriptor, PatternDescriptor, TextureDescriptor,
    };

    fn sample_set() -> DescriptorSet {
        DescriptorSet::new(
            TextureDescriptor {
                mean_intensity: 128.123456,
                std_deviation: 10.0,
                contrast: 0.5,
                homogeneity: 0.87654321,
            },
            vec![0.0, 0.333333333, 1.0],
            DimensionDescriptor {
                width: 100.0,
                height: 200.0,
                aspect_ratio: 0.5,
                area: 20_000.0,
            },
            EdgeDescriptor {
                density: 0.1,
                orientation: 0.25,
            },
            PatternDescriptor {
                complexity_score: 5.25,
                symmetry_score: 80.0,
            },
            Utc::now(),
        )
    }

    #[test]
    fn rounds_half_up_at_fixed_precision() {
        assert_eq!(round_half_up(0.123_44, 4), 0.1234);
        assert_eq!(round_half_up(0.123_46, 4), 0.1235);
        // Half-up, not half-even: .00025 goes to .0003, not .0002.
        assert_eq!(round_half_up(0.000_25, 4), 0.0003);
        assert_eq!(round_half_up(0.000_05, 4), 0.0001);
        assert_eq!(round_half_up(128.123_456, 4), 128.1235);
    }

    #[test]
    fn rounding_is_stable_under_rerounding() {
        for value in [0.1234, 0.1235, 128.1235, 0.0, 1.0, 99.9999] {
            assert_eq!(round_half_up(value, 4), value);
        }
    }

    #[test]
    fn nearby_values_canonicalize_identically() {
        // Differ by less than half the smallest representable unit at P=4.
        assert_eq!(round_half_up(0.123_400_01, 4), round_half_up(0.123_399_99, 4));
    }

    #[test]
    fn sanitize_replaces_non_finite_values() {
        assert_eq!(sanitize(f64::NAN), 0.0);
        assert_eq!(sanitize(f64::INFINITY), 1.0);
        assert_eq!(sanitize(f64::NEG_INFINITY), 0.0);
        assert_eq!(sanitize(0.5), 0.5);
    }

    #[test]
    fn negative_zero_never_survives() {
        assert_eq!(round_half_up(-0.000_001, 4).to_string(), "0");
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let config = ExtractionConfig::default();
        let canonical = canonicalize(&sample_set(), &config);
        let again = canonicalize(&canonical.with_capture_time(Utc::now()), &config);
        assert_eq!(canonical, again);
    }

    #[test]
    fn capture_time_is_excluded() {
        let config = ExtractionConfig::default();
        let set = sample_set();
        let earlier = set.clone();
        let later = canonicalize(&set, &config).with_capture_time(Utc::now());
        assert_eq!(
            canonicalize(&earlier, &config).to_canonical_bytes().unwrap(),
            canonicalize(&later, &config).to_canonical_bytes().unwrap()
        );
    }

    #[test]
    fn key_order_is_insertion_independent() {
        let config = ExtractionConfig::default();
        let set = sample_set();
        let reference = canonicalize(&set, &config);

        // Rebuild the same maps in reversed insertion order.
        let mut texture = BTreeMap::new();
        for (k, v) in set.texture().iter().rev() {
            texture.insert(k.clone(), *v);
        }
        let mut dimensions = BTreeMap::new();
        for (k, v) in set.dimensions().iter().rev() {
            dimensions.insert(k.clone(), *v);
        }
        let mut pattern = BTreeMap::new();
        for (k, v) in set.pattern().iter().rev() {
            pattern.insert(k.clone(), *v);
        }
        let permuted = DescriptorSet::from_parts(
            texture,
            set.histogram().to_vec(),
            dimensions,
            set.edge().to_vec(),
            pattern,
            set.capture_time(),
        );

        let canonical = canonicalize(&permuted, &config);
        assert_eq!(canonical, reference);
        assert_eq!(
            canonical.to_canonical_bytes().unwrap(),
            reference.to_canonical_bytes().unwrap()
        );
    }

    #[test]
    fn canonical_bytes_are_compact_and_field_ordered() {
        let config = ExtractionConfig::default();
        let bytes = canonicalize(&sample_set(), &config)
            .to_canonical_bytes()
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("{\"dimensions\":{"));
        let dim_pos = text.find("\"dimensions\"").unwrap();
        let edge_pos = text.find("\"edge\"").unwrap();
        let hist_pos = text.find("\"histogram\"").unwrap();
        let pattern_pos = text.find("\"pattern\"").unwrap();
        let texture_pos = text.find("\"texture\"").unwrap();
        assert!(dim_pos < edge_pos && edge_pos < hist_pos);
        assert!(hist_pos < pattern_pos && pattern_pos < texture_pos);
        assert!(!text.contains(' '));
        assert!(!text.contains("capture_time"));
    }
}
