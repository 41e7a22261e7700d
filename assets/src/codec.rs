//! Asset instances and the per-type codecs that read and write them.

use crate::error::CodecError;
use crate::kind::AssetType;
use crate::metadata::AssetMetadata;
use downcast_rs::{impl_downcast, DowncastSync};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

/// Marker trait for anything that can be stored in the asset caches.
///
/// Instances are type-erased as `Arc<dyn Asset>` and recovered with a checked
/// downcast, so asking for the wrong concrete type yields nothing instead of
/// a crash.
pub trait Asset: DowncastSync {
    /// The type tag of every instance of this asset.
    fn static_type() -> AssetType
    where
        Self: Sized;

    fn asset_type(&self) -> AssetType;
}

impl_downcast!(sync Asset);

/// Shared reference to a type-erased asset instance.
pub type SharedAsset = Arc<dyn Asset>;

/// Encode/decode strategy for one asset type.
pub trait AssetCodec {
    /// Writes `asset` to `path` on disk.
    fn serialize(&self, path: &Path, metadata: &AssetMetadata, asset: &dyn Asset) -> Result<(), CodecError>;

    /// Reads the asset described by `metadata` from `path`.
    fn try_load(&self, path: &Path, metadata: &AssetMetadata) -> Result<SharedAsset, CodecError>;
}

/// Table of codecs, one per asset type.
#[derive(Default)]
pub struct Codecs {
    codecs: HashMap<AssetType, Box<dyn AssetCodec>>,
}

impl Codecs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `codec` for `asset_type`, replacing a previously
    /// registered one.
    pub fn register<C: AssetCodec + 'static>(&mut self, asset_type: AssetType, codec: C) {
        self.codecs.insert(asset_type, Box::new(codec));
    }

    pub fn with<C: AssetCodec + 'static>(mut self, asset_type: AssetType, codec: C) -> Self {
        self.register(asset_type, codec);
        self
    }

    pub fn get(&self, asset_type: AssetType) -> Option<&dyn AssetCodec> {
        self.codecs.get(&asset_type).map(|c| c.as_ref())
    }

    pub fn contains(&self, asset_type: AssetType) -> bool {
        self.codecs.contains_key(&asset_type)
    }
}

/// Codec storing any serde-serializable asset as a JSON document.
pub struct JsonCodec<T>(PhantomData<fn() -> T>);

impl<T> JsonCodec<T> {
    pub fn new() -> Self {
        JsonCodec(PhantomData)
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AssetCodec for JsonCodec<T>
where
    T: Asset + Serialize + DeserializeOwned,
{
    fn serialize(&self, path: &Path, _: &AssetMetadata, asset: &dyn Asset) -> Result<(), CodecError> {
        let asset = asset
            .downcast_ref::<T>()
            .ok_or(CodecError::WrongAssetType {
                expected: T::static_type(),
            })?;

        let json = serde_json::to_string_pretty(asset).map_err(|e| CodecError::Decode(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CodecError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, json).map_err(|source| CodecError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn try_load(&self, path: &Path, _: &AssetMetadata) -> Result<SharedAsset, CodecError> {
        let json = std::fs::read_to_string(path).map_err(|source| CodecError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let asset: T = serde_json::from_str(&json).map_err(|e| CodecError::Decode(e.to_string()))?;

        Ok(Arc::new(asset))
    }
}
