use crate::handle::AssetHandle;
use crate::kind::AssetType;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while reading, writing or mutating the asset registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot access registry file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("registry file is not valid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("registry file has no `Assets` sequence")]
    MissingAssets,
    #[error("unknown asset type `{0}`")]
    UnknownType(String),
    #[error("handle {handle} is already registered for {existing:?}")]
    DuplicateHandle {
        handle: AssetHandle,
        existing: PathBuf,
    },
}

/// Errors produced by asset codecs and the importer dispatch.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("there is no codec for assets of type {0}")]
    NoCodec(AssetType),
    #[error("cannot access asset file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode asset: {0}")]
    Decode(String),
    #[error("codec for {expected} received an asset of a different type")]
    WrongAssetType { expected: AssetType },
}

/// Errors produced while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse settings: {0}")]
    Json(#[from] serde_json::Error),
}
