//! Asset identity and content caching.
//!
//! Every file under the asset root that has a known extension is an asset
//! identified by a stable [`AssetHandle`]. The [`AssetManager`] keeps the
//! path to handle mapping in a registry that is persisted in the asset root,
//! recovers entries of files moved outside of the editor and loads asset
//! contents on demand through registered codecs.

pub mod cache;
pub mod codec;
pub mod database;
pub mod error;
pub mod handle;
pub mod importer;
pub mod kind;
pub mod library;
pub mod manager;
pub mod metadata;
pub mod recovery;
pub mod registry;
pub mod scanner;
pub mod settings;
pub mod sidecar;

pub use codec::{Asset, AssetCodec, Codecs, JsonCodec, SharedAsset};
pub use error::{CodecError, RegistryError, SettingsError};
pub use handle::AssetHandle;
pub use kind::{AssetType, Classifier};
pub use manager::{AssetManager, LoadReport};
pub use metadata::AssetMetadata;
pub use scanner::ScanResults;
pub use settings::Settings;
pub use sidecar::{TextureFilterMode, TextureImportSettings, TextureWrapMode};
