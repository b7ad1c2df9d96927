//! Digest generation over canonical descriptor values.

use sha3::{Digest, Sha3_256};

use crate::canonical::CanonicalDescriptor;
use crate::error::{Result, WeftmarkError};

/// Separator joining two digests in a combined hash.
const COMBINED_SEPARATOR: &str = ":";

/// Digest selection, resolved from a configured algorithm name.
///
/// The name is part of the pinned configuration; an unrecognized name fails
/// at startup rather than per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// SHA3-256, 256-bit output.
    #[default]
    Sha3_256,
}

impl HashAlgorithm {
    /// Resolve an algorithm by its configured name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sha3-256" | "sha3_256" => Ok(Self::Sha3_256),
            other => Err(WeftmarkError::HashAlgorithmUnavailable(other.to_owned())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha3_256 => "sha3-256",
        }
    }

    /// Digest arbitrary bytes and render as lowercase hex (64 characters).
    pub fn digest_hex(&self, data: &[u8]) -> String {
        match self {
            Self::Sha3_256 => {
                let mut hasher = Sha3_256::new();
                hasher.update(data);
                hex::encode(hasher.finalize())
            }
        }
    }
}

/// Hash a canonical descriptor: serialize to the canonical byte encoding and
/// digest.
pub fn feature_hash(canonical: &CanonicalDescriptor, algorithm: HashAlgorithm) -> Result<String> {
    let bytes = canonical.to_canonical_bytes()?;
    Ok(algorithm.digest_hex(&bytes))
}

/// Bind two digests together: `digest(a ++ ":" ++ b)`.
///
/// Used to tie a features hash to a registration-time hash without the
/// timestamp ever entering the features hash itself.
pub fn combined_hash(hash_a: &str, hash_b: &str, algorithm: HashAlgorithm) -> String {
    let joined = format!("{hash_a}{COMBINED_SEPARATOR}{hash_b}");
    algorithm.digest_hex(joined.as_bytes())
}
