//! Persistent storage for the asset registry.
//!
//! The registry file is a JSON document with a single top-level `Assets`
//! sequence. Each element holds the `Handle`, the root-relative `FilePath`
//! (with `/` separators) and the `Type` name of one asset.

use crate::error::RegistryError;
use crate::handle::AssetHandle;
use crate::kind::AssetType;
use crate::library::to_registry_string;
use crate::metadata::AssetMetadata;
use crate::registry::Registry;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default name of the registry file inside the asset root.
pub const DEFAULT_REGISTRY_NAME: &str = "assets.vsreg";

/// One element of the `Assets` sequence exactly as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRecord {
    #[serde(rename = "Handle")]
    pub handle: u64,
    #[serde(rename = "FilePath")]
    pub file_path: String,
    #[serde(rename = "Type")]
    pub asset_type: String,
}

impl RegistryRecord {
    pub fn from_metadata(metadata: &AssetMetadata) -> Self {
        Self {
            handle: metadata.handle.raw(),
            file_path: to_registry_string(&metadata.file_path),
            asset_type: metadata.asset_type.as_str().to_string(),
        }
    }

    /// Converts the record to metadata. Fails if the type name is unknown.
    pub fn to_metadata(&self) -> Result<AssetMetadata, RegistryError> {
        Ok(AssetMetadata::new(
            AssetHandle::from_raw(self.handle),
            self.asset_type.parse::<AssetType>()?,
            PathBuf::from(&self.file_path),
        ))
    }
}

#[derive(Serialize)]
struct RegistryDocument<'a> {
    #[serde(rename = "Assets")]
    assets: &'a [RegistryRecord],
}

#[derive(Deserialize)]
struct RawRegistryDocument {
    #[serde(rename = "Assets")]
    assets: Option<Vec<Value>>,
}

/// The registry file of one asset root.
pub struct Database {
    file: PathBuf,
}

impl Database {
    pub fn new(file: PathBuf) -> Self {
        Self { file }
    }

    #[inline]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Reads all records from the registry file.
    ///
    /// Returns `Ok(None)` if the file does not exist. Elements of the
    /// `Assets` sequence that do not have the expected shape are skipped
    /// with a warning.
    pub fn load(&self) -> Result<Option<Vec<RegistryRecord>>, RegistryError> {
        if !self.file.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(&self.file).map_err(|source| RegistryError::Io {
            path: self.file.clone(),
            source,
        })?;

        parse_records(&json).map(Some)
    }

    /// Writes every entry of `registry` to the registry file.
    pub fn flush(&self, registry: &Registry) -> Result<(), RegistryError> {
        let mut records: Vec<RegistryRecord> = registry.iter().map(RegistryRecord::from_metadata).collect();
        records.sort_by(|a, b| a.file_path.cmp(&b.file_path));

        let json = serde_json::to_string_pretty(&RegistryDocument { assets: &records })?;

        std::fs::write(&self.file, json).map_err(|source| RegistryError::Io {
            path: self.file.clone(),
            source,
        })?;

        info!("Saved asset registry with {} entries to {:?}", records.len(), self.file);
        Ok(())
    }
}

/// Parses the text of a registry file.
pub fn parse_records(json: &str) -> Result<Vec<RegistryRecord>, RegistryError> {
    let document: RawRegistryDocument = serde_json::from_str(json)?;
    let values = document.assets.ok_or(RegistryError::MissingAssets)?;

    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<RegistryRecord>(value) {
            Ok(t) => Some(t),
            Err(e) => {
                warn!("Skipping malformed registry element #{}: {}", i, e);
                None
            }
        })
        .collect())
}
