//! Filesystem-backed record store: one JSON document per record.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::descriptor::DescriptorSet;
use crate::error::{Result, WeftmarkError};
use crate::identity::IdentityRecord;
use crate::store::RecordStore;

const FEATURES_DIR: &str = "features";
const IDENTITIES_DIR: &str = "identities";
const FEATURES_SUFFIX: &str = "_features.json";
const IDENTITY_SUFFIX: &str = "_identity.json";

/// Record store rooted at a local directory.
///
/// Layout: `<root>/features/<id>_features.json` and
/// `<root>/identities/<id>_identity.json`. Writes go through a temp file and
/// rename, so a crash mid-write never leaves a truncated record behind.
#[derive(Debug)]
pub struct FsRecordStore {
    features_dir: PathBuf,
    identities_dir: PathBuf,
}

impl FsRecordStore {
    /// Open (and create, if needed) a store rooted at `root`.
    pub fn open(root: &Path) -> Result<Self> {
        let features_dir = root.join(FEATURES_DIR);
        let identities_dir = root.join(IDENTITIES_DIR);
        fs::create_dir_all(&features_dir)?;
        fs::create_dir_all(&identities_dir)?;
        info!(root = %root.display(), "Opened record store");
        Ok(Self {
            features_dir,
            identities_dir,
        })
    }

    fn features_path(&self, item_id: &str) -> Result<PathBuf> {
        validate_item_id(item_id)?;
        Ok(self.features_dir.join(format!("{item_id}{FEATURES_SUFFIX}")))
    }

    fn identity_path(&self, item_id: &str) -> Result<PathBuf> {
        validate_item_id(item_id)?;
        Ok(self
            .identities_dir
            .join(format!("{item_id}{IDENTITY_SUFFIX}")))
    }
}

/// Identifiers become file names; restrict them to a safe alphabet.
fn validate_item_id(item_id: &str) -> Result<()> {
    let valid = !item_id.is_empty()
        && item_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(WeftmarkError::Storage(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid item id: {item_id:?}"),
        )))
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes =
        serde_json::to_vec_pretty(value).map_err(|e| WeftmarkError::Serialization(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Wrote record");
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let value =
        serde_json::from_slice(&bytes).map_err(|e| WeftmarkError::Serialization(e.to_string()))?;
    Ok(Some(value))
}

fn remove_if_present(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

impl RecordStore for FsRecordStore {
    fn put_features(&self, item_id: &str, features: &DescriptorSet) -> Result<()> {
        write_json(&self.features_path(item_id)?, features)
    }

    fn get_features(&self, item_id: &str) -> Result<Option<DescriptorSet>> {
        read_json(&self.features_path(item_id)?)
    }

    fn put_identity(&self, item_id: &str, identity: &IdentityRecord) -> Result<()> {
        write_json(&self.identity_path(item_id)?, identity)
    }

    fn get_identity(&self, item_id: &str) -> Result<Option<IdentityRecord>> {
        read_json(&self.identity_path(item_id)?)
    }

    fn delete(&self, item_id: &str) -> Result<bool> {
        // Identity first: no moment where an identity exists without its
        // features.
        let identity_removed = remove_if_present(&self.identity_path(item_id)?)?;
        let features_removed = remove_if_present(&self.features_path(item_id)?)?;
        Ok(identity_removed || features_removed)
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        // Identity records mark completed registrations; orphaned feature
        // files from interrupted registrations are not listed.
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.identities_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(id) = name.strip_suffix(IDENTITY_SUFFIX) {
                ids.push(id.to_owned());
            }
        }
        ids.sort();
        Ok(ids)
    }
}
