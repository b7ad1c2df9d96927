//! In-memory record store.
//!
//! Backs unit tests and embedded callers that do not want disk persistence.

use dashmap::DashMap;

use crate::descriptor::DescriptorSet;
use crate::error::Result;
use crate::identity::IdentityRecord;
use crate::store::RecordStore;

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    features: DashMap<String, DescriptorSet>,
    identities: DashMap<String, IdentityRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn put_features(&self, item_id: &str, features: &DescriptorSet) -> Result<()> {
        self.features.insert(item_id.to_owned(), features.clone());
        Ok(())
    }

    fn get_features(&self, item_id: &str) -> Result<Option<DescriptorSet>> {
        Ok(self.features.get(item_id).map(|entry| entry.value().clone()))
    }

    fn put_identity(&self, item_id: &str, identity: &IdentityRecord) -> Result<()> {
        self.identities.insert(item_id.to_owned(), identity.clone());
        Ok(())
    }

    fn get_identity(&self, item_id: &str) -> Result<Option<IdentityRecord>> {
        Ok(self
            .identities
            .get(item_id)
            .map(|entry| entry.value().clone()))
    }

    fn delete(&self, item_id: &str) -> Result<bool> {
        let identity_removed = self.identities.remove(item_id).is_some();
        let features_removed = self.features.remove(item_id).is_some();
        Ok(identity_removed || features_removed)
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self
            .identities
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn identity(item_id: &str) -> IdentityRecord {
        IdentityRecord {
            item_id: item_id.to_owned(),
            features_hash: "a".repeat(64),
            timestamp_hash: "b".repeat(64),
            combined_hash: "c".repeat(64),
            algorithm_version: crate::config::ALGORITHM_VERSION.to_owned(),
            creation_time: Utc::now(),
            image_reference: None,
        }
    }

    #[test]
    fn delete_then_get_is_empty() {
        let store = MemoryRecordStore::new();
        store.put_identity("X1", &identity("X1")).unwrap();
        assert!(store.delete("X1").unwrap());
        assert!(store.get_identity("X1").unwrap().is_none());
        assert!(!store.delete("X1").unwrap());
    }

    #[test]
    fn list_is_sorted() {
        let store = MemoryRecordStore::new();
        for id in ["B2", "A1", "C3"] {
            store.put_identity(id, &identity(id)).unwrap();
        }
        assert_eq!(store.list_ids().unwrap(), vec!["A1", "B2", "C3"]);
    }
}
