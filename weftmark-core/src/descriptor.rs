//! Descriptor data model.
//!
//! A [`DescriptorSet`] is the complete set of quantitative visual descriptors
//! extracted from one photograph. It is constructed once by extraction and
//! never mutated afterwards; canonicalization and comparison borrow it
//! read-only. Mapping-typed categories are held in `BTreeMap`s so that key
//! order is a property of the type, not of insertion history.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WeftmarkError};

pub const KEY_MEAN_INTENSITY: &str = "mean_intensity";
pub const KEY_STD_DEVIATION: &str = "std_deviation";
pub const KEY_CONTRAST: &str = "contrast";
pub const KEY_HOMOGENEITY: &str = "homogeneity";

pub const KEY_WIDTH: &str = "width";
pub const KEY_HEIGHT: &str = "height";
pub const KEY_ASPECT_RATIO: &str = "aspect_ratio";
pub const KEY_AREA: &str = "area";

pub const KEY_COMPLEXITY: &str = "complexity_score";
pub const KEY_SYMMETRY: &str = "symmetry_score";

/// Index of the edge density value in the edge sequence.
pub const EDGE_DENSITY: usize = 0;
/// Index of the mean edge orientation value in the edge sequence.
pub const EDGE_ORIENTATION: usize = 1;
/// Fixed length of the edge sequence.
pub const EDGE_LEN: usize = 2;

/// Descriptor categories, used for degraded-extraction reporting and error
/// context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    Texture,
    Histogram,
    Dimensions,
    Edge,
    Pattern,
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Texture => "texture",
            Self::Histogram => "histogram",
            Self::Dimensions => "dimensions",
            Self::Edge => "edge",
            Self::Pattern => "pattern",
        };
        f.write_str(name)
    }
}

/// Local-neighborhood and co-occurrence statistics of the smoothed grayscale
/// image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextureDescriptor {
    pub mean_intensity: f64,
    pub std_deviation: f64,
    pub contrast: f64,
    pub homogeneity: f64,
}

impl TextureDescriptor {
    /// All-zero descriptor substituted when texture analysis degrades.
    pub fn zeroed() -> Self {
        Self::default()
    }
}

/// Edge density and circular-mean orientation, both normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeDescriptor {
    pub density: f64,
    pub orientation: f64,
}

impl EdgeDescriptor {
    pub fn zeroed() -> Self {
        Self::default()
    }
}

/// Raw geometric descriptors in native pixels. No resizing happens upstream,
/// so cross-resolution captures diverge here by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionDescriptor {
    pub width: f64,
    pub height: f64,
    pub aspect_ratio: f64,
    pub area: f64,
}

/// Complexity/symmetry scores derived from the texture output and the
/// smoothed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternDescriptor {
    pub complexity_score: f64,
    pub symmetry_score: f64,
}

/// How the symmetry score was obtained.
///
/// The aspect-ratio form is a lower-fidelity stand-in for descriptor-only
/// recomputation; it is never substituted silently for the pixel-mirror form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymmetrySource {
    PixelMirror,
    AspectRatioFallback,
}

/// The complete extracted descriptors of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSet {
    texture: BTreeMap<String, f64>,
    histogram: Vec<f64>,
    dimensions: BTreeMap<String, f64>,
    edge: Vec<f64>,
    pattern: BTreeMap<String, f64>,
    /// Record metadata only; excluded from canonicalization and hashing.
    capture_time: DateTime<Utc>,
}

impl DescriptorSet {
    pub fn new(
        texture: TextureDescriptor,
        histogram: Vec<f64>,
        dimensions: DimensionDescriptor,
        edge: EdgeDescriptor,
        pattern: PatternDescriptor,
        capture_time: DateTime<Utc>,
    ) -> Self {
        let mut texture_map = BTreeMap::new();
        texture_map.insert(KEY_MEAN_INTENSITY.to_owned(), texture.mean_intensity);
        texture_map.insert(KEY_STD_DEVIATION.to_owned(), texture.std_deviation);
        texture_map.insert(KEY_CONTRAST.to_owned(), texture.contrast);
        texture_map.insert(KEY_HOMOGENEITY.to_owned(), texture.homogeneity);

        let mut dimension_map = BTreeMap::new();
        dimension_map.insert(KEY_WIDTH.to_owned(), dimensions.width);
        dimension_map.insert(KEY_HEIGHT.to_owned(), dimensions.height);
        dimension_map.insert(KEY_ASPECT_RATIO.to_owned(), dimensions.aspect_ratio);
        dimension_map.insert(KEY_AREA.to_owned(), dimensions.area);

        let mut pattern_map = BTreeMap::new();
        pattern_map.insert(KEY_COMPLEXITY.to_owned(), pattern.complexity_score);
        pattern_map.insert(KEY_SYMMETRY.to_owned(), pattern.symmetry_score);

        Self {
            texture: texture_map,
            histogram,
            dimensions: dimension_map,
            edge: vec![edge.density, edge.orientation],
            pattern: pattern_map,
            capture_time,
        }
    }

    /// Assemble a descriptor set directly from raw category maps.
    ///
    /// Intended for loading persisted records and for tests; extraction goes
    /// through [`DescriptorSet::new`]. Key order of the input maps is
    /// irrelevant.
    pub fn from_parts(
        texture: BTreeMap<String, f64>,
        histogram: Vec<f64>,
        dimensions: BTreeMap<String, f64>,
        edge: Vec<f64>,
        pattern: BTreeMap<String, f64>,
        capture_time: DateTime<Utc>,
    ) -> Self {
        Self {
            texture,
            histogram,
            dimensions,
            edge,
            pattern,
            capture_time,
        }
    }

    pub fn texture(&self) -> &BTreeMap<String, f64> {
        &self.texture
    }

    pub fn histogram(&self) -> &[f64] {
        &self.histogram
    }

    pub fn dimensions(&self) -> &BTreeMap<String, f64> {
        &self.dimensions
    }

    pub fn edge(&self) -> &[f64] {
        &self.edge
    }

    pub fn pattern(&self) -> &BTreeMap<String, f64> {
        &self.pattern
    }

    pub fn capture_time(&self) -> DateTime<Utc> {
        self.capture_time
    }

    /// Look up a required texture value.
    pub fn texture_value(&self, key: &str) -> Result<f64> {
        require(&self.texture, FeatureCategory::Texture, key)
    }

    /// Look up a required dimension value.
    pub fn dimension_value(&self, key: &str) -> Result<f64> {
        require(&self.dimensions, FeatureCategory::Dimensions, key)
    }

    /// Look up a required pattern value.
    pub fn pattern_value(&self, key: &str) -> Result<f64> {
        require(&self.pattern, FeatureCategory::Pattern, key)
    }
}

/// Required-key lookup: an absent key is a [`WeftmarkError::MissingFeature`],
/// never a silent zero.
fn require(map: &BTreeMap<String, f64>, category: FeatureCategory, key: &str) -> Result<f64> {
    map.get(key)
        .copied()
        .ok_or_else(|| WeftmarkError::MissingFeature {
            category,
            key: key.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> DescriptorSet {
        DescriptorSet::new(
            TextureDescriptor {
                mean_intensity: 128.0,
                std_deviation: 10.0,
                contrast: 0.5,
                homogeneity: 0.8,
            },
            vec![0.0, 0.5, 1.0],
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
    fn maps_hold_their_fixed_key_sets() {
        let set = sample_set();
        let texture_keys: Vec<_> = set.texture().keys().map(String::as_str).collect();
        assert_eq!(
            texture_keys,
            vec![
                KEY_CONTRAST,
                KEY_HOMOGENEITY,
                KEY_MEAN_INTENSITY,
                KEY_STD_DEVIATION
            ]
        );
        let dimension_keys: Vec<_> = set.dimensions().keys().map(String::as_str).collect();
        assert_eq!(
            dimension_keys,
            vec![KEY_AREA, KEY_ASPECT_RATIO, KEY_HEIGHT, KEY_WIDTH]
        );
        assert_eq!(set.edge().len(), EDGE_LEN);
    }

    #[test]
    fn missing_key_is_an_error_not_a_default() {
        let set = sample_set();
        let err = set.texture_value("weave_angle").unwrap_err();
        assert!(matches!(
            err,
            WeftmarkError::MissingFeature {
                category: FeatureCategory::Texture,
                ..
            }
        ));
    }

    #[test]
    fn lookups_return_stored_values() {
        let set = sample_set();
        assert_eq!(set.texture_value(KEY_MEAN_INTENSITY).unwrap(), 128.0);
        assert_eq!(set.dimension_value(KEY_AREA).unwrap(), 20_000.0);
        assert_eq!(set.pattern_value(KEY_SYMMETRY).unwrap(), 80.0);
        assert_eq!(set.edge()[EDGE_DENSITY], 0.1);
        assert_eq!(set.edge()[EDGE_ORIENTATION], 0.25);
    }
}
