//! Registry records describing a single asset.

use crate::handle::AssetHandle;
use crate::kind::AssetType;
use std::path::PathBuf;

/// Identity, type and location of one asset.
///
/// `file_path` is always relative to the asset root. `is_data_loaded`
/// tells whether an instance of this asset currently lives in the
/// loaded-asset cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetMetadata {
    pub handle: AssetHandle,
    pub asset_type: AssetType,
    pub file_path: PathBuf,
    pub is_data_loaded: bool,
}

impl AssetMetadata {
    pub fn new(handle: AssetHandle, asset_type: AssetType, file_path: PathBuf) -> Self {
        Self {
            handle,
            asset_type,
            file_path,
            is_data_loaded: false,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }
}
