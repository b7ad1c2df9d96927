//! Registration and verification orchestration over a record store.

use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::canonical::canonicalize;
use crate::config::ALGORITHM_VERSION;
use crate::descriptor::FeatureCategory;
use crate::error::Result;
use crate::extract::FeatureExtractor;
use crate::hash::{combined_hash, feature_hash};
use crate::identity::IdentityRecord;
use crate::similarity::{compare, SimilarityReport};
use crate::store::RecordStore;

/// Length of generated item identifiers.
const ITEM_ID_LEN: usize = 8;

/// Outcome of a completed registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub identity: IdentityRecord,
    /// Analyzer categories that degraded to all-zero output during
    /// extraction.
    pub degraded: Vec<FeatureCategory>,
}

/// Outcome of a verification against a stored reference.
#[derive(Debug, Clone)]
pub struct Verification {
    pub report: SimilarityReport,
    pub degraded: Vec<FeatureCategory>,
}

/// Ties the extractor to a record store and enforces the registration write
/// protocol.
pub struct Registrar<S: RecordStore> {
    store: S,
    extractor: FeatureExtractor,
}

impl<S: RecordStore> Registrar<S> {
    pub fn new(store: S, extractor: FeatureExtractor) -> Self {
        Self { store, extractor }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Register a new item from its photograph.
    ///
    /// The features record is written before the identity record; a crash
    /// between the two reads as "registration did not complete" (the id is
    /// not listed and has no identity), never as a valid partial record.
    pub fn register(&self, image: &Path, item_id: Option<String>) -> Result<Registration> {
        let item_id = item_id.unwrap_or_else(generate_item_id);
        let extraction = self.extractor.extract_path(image)?;
        if extraction.is_degraded() {
            warn!(
                %item_id,
                degraded = ?extraction.degraded,
                "Registering with degraded analyzer output"
            );
        }

        let config = self.extractor.config();
        let canonical = canonicalize(&extraction.descriptors, config);
        let features_hash = feature_hash(&canonical, config.hash_algorithm)?;

        let creation_time = Utc::now();
        // Persist the canonical values: re-hashing the stored record must
        // reproduce `features_hash`.
        let stored_features = canonical.with_capture_time(creation_time);
        self.store.put_features(&item_id, &stored_features)?;

        let timestamp_hash = config
            .hash_algorithm
            .digest_hex(creation_time.timestamp_millis().to_string().as_bytes());
        let identity = IdentityRecord {
            item_id: item_id.clone(),
            combined_hash: combined_hash(&features_hash, &timestamp_hash, config.hash_algorithm),
            features_hash,
            timestamp_hash,
            algorithm_version: ALGORITHM_VERSION.to_owned(),
            creation_time,
            image_reference: Some(image.display().to_string()),
        };
        self.store.put_identity(&item_id, &identity)?;

        info!(%item_id, hash = %identity.combined_hash, "Registered item");
        Ok(Registration {
            identity,
            degraded: extraction.degraded,
        })
    }

    /// Verify a candidate photograph against a registered item.
    ///
    /// Returns `Ok(None)` when the item id is unknown.
    pub fn verify(&self, item_id: &str, image: &Path) -> Result<Option<Verification>> {
        let Some(reference) = self.store.get_features(item_id)? else {
            return Ok(None);
        };

        let extraction = self.extractor.extract_path(image)?;
        if extraction.is_degraded() {
            warn!(
                item_id,
                degraded = ?extraction.degraded,
                "Verifying with degraded analyzer output"
            );
        }

        let report = compare(&reference, &extraction.descriptors, self.extractor.config())?;
        info!(
            item_id,
            total = report.total,
            authentic = report.authentic,
            "Compared candidate against stored reference"
        );
        Ok(Some(Verification {
            report,
            degraded: extraction.degraded,
        }))
    }

    pub fn identity(&self, item_id: &str) -> Result<Option<IdentityRecord>> {
        self.store.get_identity(item_id)
    }

    pub fn list(&self) -> Result<Vec<String>> {
        self.store.list_ids()
    }

    pub fn delete(&self, item_id: &str) -> Result<bool> {
        self.store.delete(item_id)
    }
}

/// Generated identifiers: first eight hex digits of a UUIDv4, uppercased.
fn generate_item_id() -> String {
    Uuid::new_v4().simple().to_string()[..ITEM_ID_LEN].to_uppercase()
}
