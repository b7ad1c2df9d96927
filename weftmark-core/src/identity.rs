//! Identity records binding feature hashes to a registration event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The stored digital identity of one registered item.
///
/// Created once at registration and immutable afterwards; the store offers
/// create/read/delete only, no update. `algorithm_version` records which
/// parameter set produced the hashes, so records outlive changes to the
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub item_id: String,
    /// Digest of the canonical descriptor values.
    pub features_hash: String,
    /// Digest of the registration timestamp.
    pub timestamp_hash: String,
    /// Digest binding the two hashes above.
    pub combined_hash: String,
    pub algorithm_version: String,
    pub creation_time: DateTime<Utc>,
    /// Path or URI of the registration photograph, if known.
    pub image_reference: Option<String>,
}
