//! Dispatches serialize and load requests to the codec registered for the
//! asset type.

use crate::codec::{Asset, Codecs, SharedAsset};
use crate::error::CodecError;
use crate::library::Library;
use crate::metadata::AssetMetadata;
use log::{error, trace};

pub struct Importer {
    library: Library,
    codecs: Codecs,
}

impl Importer {
    pub fn new(library: Library, codecs: Codecs) -> Self {
        Self { library, codecs }
    }

    /// Writes `asset` to the file described by `metadata`.
    ///
    /// Does nothing (apart from logging) when there is no codec for the
    /// asset type or when the codec fails.
    pub fn serialize(&self, metadata: &AssetMetadata, asset: &dyn Asset) {
        if let Err(e) = self.try_serialize(metadata, asset) {
            error!("Cannot serialize asset {:?}: {}", metadata.file_path, e);
        }
    }

    pub fn try_serialize(&self, metadata: &AssetMetadata, asset: &dyn Asset) -> Result<(), CodecError> {
        let codec = self
            .codecs
            .get(metadata.asset_type)
            .ok_or(CodecError::NoCodec(metadata.asset_type))?;

        let path = self.library.disk_path(&metadata.file_path);
        trace!("Serializing {:?} with codec for {}", path, metadata.asset_type);

        codec.serialize(&path, metadata, asset)
    }

    /// Loads the asset described by `metadata` from disk.
    ///
    /// Returns `None` when there is no codec for the asset type or the codec
    /// fails; the failure is logged and the load may be retried later.
    pub fn try_load_asset(&self, metadata: &AssetMetadata) -> Option<SharedAsset> {
        let codec = match self.codecs.get(metadata.asset_type) {
            Some(t) => t,
            None => {
                error!(
                    "There is no codec for assets of type {} ({:?})",
                    metadata.asset_type, metadata.file_path
                );
                return None;
            }
        };

        let path = self.library.disk_path(&metadata.file_path);
        trace!("Loading {:?} as {}...", path, metadata.asset_type);

        match codec.try_load(&path, metadata) {
            Ok(t) => Some(t),
            Err(e) => {
                error!("Cannot load asset {} from {:?}: {}", metadata.handle, path, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::codec::{Asset, AssetCodec, Codecs, SharedAsset};
    use crate::error::CodecError;
    use crate::handle::AssetHandle;
    use crate::importer::Importer;
    use crate::kind::AssetType;
    use crate::library::Library;
    use crate::metadata::AssetMetadata;
    use std::cell::Cell;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use std::sync::Arc;

    struct Texture;

    impl Asset for Texture {
        fn static_type() -> AssetType {
            AssetType::Texture
        }

        fn asset_type(&self) -> AssetType {
            AssetType::Texture
        }
    }

    struct RecordingCodec {
        last_path: Rc<Cell<Option<PathBuf>>>,
    }

    impl AssetCodec for RecordingCodec {
        fn serialize(&self, path: &Path, _: &AssetMetadata, _: &dyn Asset) -> Result<(), CodecError> {
            self.last_path.set(Some(path.to_path_buf()));
            Ok(())
        }

        fn try_load(&self, path: &Path, _: &AssetMetadata) -> Result<SharedAsset, CodecError> {
            self.last_path.set(Some(path.to_path_buf()));
            Err(CodecError::Decode("broken".into()))
        }
    }

    fn texture_metadata() -> AssetMetadata {
        AssetMetadata::new(AssetHandle::from_raw(5), AssetType::Texture, "t/a.png".into())
    }

    #[test]
    fn missing_codec_is_reported() {
        let importer = Importer::new(Library::new("/assets"), Codecs::new());

        assert!(matches!(
            importer.try_serialize(&texture_metadata(), &Texture),
            Err(CodecError::NoCodec(AssetType::Texture))
        ));
        assert!(importer.try_load_asset(&texture_metadata()).is_none());
    }

    #[test]
    fn codec_receives_disk_path() {
        let last_path = Rc::new(Cell::new(None));
        let codecs = Codecs::new().with(
            AssetType::Texture,
            RecordingCodec {
                last_path: last_path.clone(),
            },
        );
        let importer = Importer::new(Library::new("/assets"), codecs);

        importer.serialize(&texture_metadata(), &Texture);
        assert_eq!(last_path.take(), Some(PathBuf::from("/assets/t/a.png")));

        assert!(importer.try_load_asset(&texture_metadata()).is_none());
        assert_eq!(last_path.take(), Some(PathBuf::from("/assets/t/a.png")));
    }

    #[test]
    fn successful_load_returns_instance() {
        struct Loader;

        impl AssetCodec for Loader {
            fn serialize(&self, _: &Path, _: &AssetMetadata, _: &dyn Asset) -> Result<(), CodecError> {
                Ok(())
            }

            fn try_load(&self, _: &Path, _: &AssetMetadata) -> Result<SharedAsset, CodecError> {
                Ok(Arc::new(Texture))
            }
        }

        let importer = Importer::new(
            Library::new("/assets"),
            Codecs::new().with(AssetType::Texture, Loader),
        );

        let asset = importer.try_load_asset(&texture_metadata()).unwrap();
        assert_eq!(asset.asset_type(), AssetType::Texture);
    }
}
