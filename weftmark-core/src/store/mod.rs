//! Record persistence for feature and identity records.
//!
//! The store is deliberately thin: get/put/delete/list by item identifier.
//! Absent records are `Ok(None)`, never errors; I/O failures surface as
//! [`WeftmarkError::Storage`] and abort the enclosing operation. Persisted
//! feature records hold canonical (already-rounded) values, so loading one
//! and re-hashing it reproduces the digest recorded at registration.

pub mod fs;
pub mod memory;

pub use fs::FsRecordStore;
pub use memory::MemoryRecordStore;

use crate::descriptor::DescriptorSet;
use crate::error::Result;
use crate::identity::IdentityRecord;

/// Keyed persistence for feature and identity records.
///
/// Implementations must make a completed `put` durable before returning;
/// the registrar relies on put-features-then-put-identity ordering to
/// guarantee an identity record is never visible without its features.
pub trait RecordStore {
    fn put_features(&self, item_id: &str, features: &DescriptorSet) -> Result<()>;

    fn get_features(&self, item_id: &str) -> Result<Option<DescriptorSet>>;

    fn put_identity(&self, item_id: &str, identity: &IdentityRecord) -> Result<()>;

    fn get_identity(&self, item_id: &str) -> Result<Option<IdentityRecord>>;

    /// Remove both records of an item. Returns whether anything was deleted.
    fn delete(&self, item_id: &str) -> Result<bool>;

    /// Identifiers of completed registrations, ascending.
    fn list_ids(&self) -> Result<Vec<String>>;
}
