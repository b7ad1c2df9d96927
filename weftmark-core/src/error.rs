use thiserror::Error;

use crate::descriptor::FeatureCategory;

#[derive(Error, Debug)]
pub enum WeftmarkError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("degenerate geometry: {0}")]
    Geometry(String),

    #[error("missing {category} feature: {key}")]
    MissingFeature {
        category: FeatureCategory,
        key: String,
    },

    #[error("hash algorithm not available: {0}")]
    HashAlgorithmUnavailable(String),

    #[error("{category} analysis failed: {reason}")]
    Analysis {
        category: FeatureCategory,
        reason: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl WeftmarkError {
    /// Shorthand for the degrade-not-abort path of the independent analyzers.
    pub(crate) fn analysis(category: FeatureCategory, reason: impl Into<String>) -> Self {
        Self::Analysis {
            category,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WeftmarkError>;
