//! Weftmark Core - textile authentication from photographs
//!
//! This crate turns a photograph of a physical textile item into a
//! deterministic set of visual descriptors, canonicalizes and hashes them
//! into a repeatable digital identity, and scores later photographs against a
//! stored identity to decide authenticity.
//!
//! # Features
//!
//! - Descriptor extraction: local binary pattern and co-occurrence texture
//!   statistics, Canny-style edge density and orientation, per-channel
//!   intensity histograms, native-pixel geometry and derived pattern scores
//! - Canonicalization into an order-normalized, rounded value tree, hashed
//!   with SHA3-256 into a 64-character hex digest
//! - Weighted similarity scoring with a configurable authenticity threshold
//! - Filesystem and in-memory record stores plus registration orchestration
//!
//! # Example
//!
//! ```no_run
//! use weftmark_core::{canonicalize, feature_hash, ExtractionConfig, FeatureExtractor};
//!
//! # fn example() -> weftmark_core::Result<()> {
//! let extractor = FeatureExtractor::new(ExtractionConfig::default());
//! let extraction = extractor.extract_path("shirt.png".as_ref())?;
//!
//! let config = extractor.config();
//! let canonical = canonicalize(&extraction.descriptors, config);
//! let digest = feature_hash(&canonical, config.hash_algorithm)?;
//! println!("features hash: {digest}");
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod canonical;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod hash;
pub mod identity;
pub mod preprocess;
pub mod registrar;
pub mod similarity;
pub mod store;

// Re-export main types for convenience
pub use canonical::{canonicalize, CanonicalDescriptor};
pub use config::{ExtractionConfig, SimilarityWeights, ALGORITHM_VERSION};
pub use descriptor::{
    DescriptorSet, DimensionDescriptor, EdgeDescriptor, FeatureCategory, PatternDescriptor,
    SymmetrySource, TextureDescriptor,
};
pub use error::{Result, WeftmarkError};
pub use extract::{Extraction, FeatureExtractor};
pub use hash::{combined_hash, feature_hash, HashAlgorithm};
pub use identity::IdentityRecord;
pub use registrar::{Registrar, Registration, Verification};
pub use similarity::{compare, SimilarityReport};
pub use store::{FsRecordStore, MemoryRecordStore, RecordStore};
