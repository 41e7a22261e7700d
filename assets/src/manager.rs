//! The asset manager ties together the registry, its persistence, the
//! importer and the two asset caches.
//!
//! Typical lifecycle:
//!
//! ```no_run
//! # use assets::{AssetManager, Classifier, Codecs, Settings};
//! let settings = Settings::new("./assets");
//! let mut manager = AssetManager::new(&settings, Classifier::default(), Codecs::new());
//! let report = manager.init();
//! // ... request, create, move and delete assets ...
//! manager.shutdown();
//! ```

use crate::cache::AssetCache;
use crate::codec::{Asset, Codecs};
use crate::database::{Database, RegistryRecord};
use crate::error::RegistryError;
use crate::handle::AssetHandle;
use crate::importer::Importer;
use crate::kind::{AssetType, Classifier};
use crate::library::Library;
use crate::metadata::AssetMetadata;
use crate::recovery;
use crate::registry::Registry;
use crate::scanner::{scan_directory, ImportOutcome, ScanResults};
use crate::settings::Settings;
use crate::sidecar::{read_texture_settings, TextureImportSettings};
use log::{debug, error, info, trace, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A stored registry entry that was not loaded.
#[derive(Debug, Clone)]
pub struct RejectedEntry {
    pub record: RegistryRecord,
    pub reason: String,
}

/// A stored entry whose file was found at a different location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredEntry {
    pub handle: AssetHandle,
    pub from: PathBuf,
    pub to: PathBuf,
}

/// A stored entry whose file could not be found anywhere. Its handle no
/// longer refers to any asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedEntry {
    pub handle: AssetHandle,
    pub asset_type: AssetType,
    pub file_path: PathBuf,
}

/// Everything that happened while loading the registry at startup.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Number of entries restored from the registry file.
    pub loaded: usize,
    pub rejected: Vec<RejectedEntry>,
    pub recovered: Vec<RecoveredEntry>,
    pub orphaned: Vec<OrphanedEntry>,
    /// Set when the registry file could not be read at all and the
    /// registry was rebuilt from the asset directory.
    pub corrupted: Option<String>,
    pub scan: ScanResults,
}

pub struct AssetManager {
    library: Library,
    classifier: Classifier,
    importer: Importer,
    database: Database,
    registry: Registry,
    loaded: AssetCache,
    memory: AssetCache,
}

impl AssetManager {
    /// Creates a manager for the asset root described by `settings`.
    ///
    /// Nothing is read from disk until [`AssetManager::init`] is called.
    pub fn new(settings: &Settings, classifier: Classifier, codecs: Codecs) -> Self {
        let library = Library::new(&settings.asset_root);

        Self {
            importer: Importer::new(library.clone(), codecs),
            registry: Registry::new(library.clone()),
            database: Database::new(settings.registry_path()),
            loaded: AssetCache::new(),
            memory: AssetCache::new(),
            classifier,
            library,
        }
    }

    /// Loads the persisted registry, rescans the asset root and persists
    /// the result.
    ///
    /// A registry file that cannot be read is not fatal: the registry is
    /// rebuilt from the directory scan alone.
    pub fn init(&mut self) -> LoadReport {
        info!("Initializing asset manager for {:?}", self.library.root());

        let mut report = match self.deserialize_registry() {
            Ok(t) => t,
            Err(e) => {
                error!(
                    "Failed to load asset registry {:?} (maybe it is corrupted): {}. Rebuilding from disk.",
                    self.database.file(),
                    e
                );
                self.registry.clear();
                LoadReport {
                    corrupted: Some(e.to_string()),
                    ..LoadReport::default()
                }
            }
        };

        report.scan = self.reload_assets();

        if !report.orphaned.is_empty() {
            error!(
                "{} registry entries could not be located and were dropped",
                report.orphaned.len()
            );
        }

        report
    }

    /// Persists the registry and releases every registry entry and cached
    /// asset.
    pub fn shutdown(&mut self) {
        self.persist();

        self.registry.clear();
        self.loaded.clear();
        self.memory.clear();
    }

    /// Scans the whole asset root for new files and persists the registry.
    pub fn reload_assets(&mut self) -> ScanResults {
        let root = self.library.root().to_path_buf();
        let results = self.process_directory(&root);
        self.persist();

        info!(
            "Scan results: {} scanned, {} imported, {} already tracked, {} not assets.",
            results.scanned, results.imported, results.tracked, results.unsupported
        );

        results
    }

    /// Recursively imports every file under `dir`.
    ///
    /// Entries of files that no longer exist are kept.
    pub fn process_directory(&mut self, dir: &Path) -> ScanResults {
        let library = self.library.clone();
        scan_directory(&library, dir, |path| self.import(path))
    }

    /// Registers the file at `path` and returns its handle.
    ///
    /// Importing a file that is already registered returns its existing
    /// handle. Files that are not assets yield [`AssetHandle::INVALID`].
    pub fn import_asset(&mut self, path: &Path) -> AssetHandle {
        self.import(path).handle()
    }

    fn import(&mut self, path: &Path) -> ImportOutcome {
        let relative = self.library.relative_path(path);

        if let Some(existing) = self.registry.get(&relative) {
            return ImportOutcome::Tracked(existing.handle);
        }

        let asset_type = self.classifier.classify(&relative);
        if asset_type.is_none() {
            trace!("Ignoring {:?}, not an asset", relative);
            return ImportOutcome::Unsupported;
        }

        let handle = self.mint_handle();
        match self
            .registry
            .insert(AssetMetadata::new(handle, asset_type, relative.clone()))
        {
            Ok(_) => {
                debug!("Imported {:?} as {} {}", relative, asset_type, handle);
                ImportOutcome::Imported(handle)
            }
            Err(e) => {
                error!("Cannot import {:?}: {}", relative, e);
                ImportOutcome::Unsupported
            }
        }
    }

    /// Generates a handle that is not used by any registered or cached asset.
    fn mint_handle(&self) -> AssetHandle {
        loop {
            let handle = AssetHandle::generate();
            if !self.registry.contains_handle(handle)
                && !self.memory.contains(handle)
                && !self.loaded.contains(handle)
            {
                return handle;
            }
        }
    }

    /// Returns the asset identified by `handle`, loading it from disk on the
    /// first request.
    ///
    /// Returns `None` when the handle is unknown, when loading fails (the
    /// load is retried on the next request) or when the asset is not a `T`.
    pub fn get_asset<T: Asset>(&mut self, handle: AssetHandle) -> Option<Arc<T>> {
        if self.memory.contains(handle) {
            return self.memory.get::<T>(handle);
        }

        let metadata = self.registry.get_by_handle(handle)?;

        if !metadata.is_data_loaded || !self.loaded.contains(handle) {
            let asset = self.importer.try_load_asset(metadata)?;
            self.loaded.insert(handle, asset);

            if let Some(flag) = self.registry.loaded_flag_mut(handle) {
                *flag = true;
            }
        }

        self.loaded.get::<T>(handle)
    }

    pub fn get_asset_by_path<T: Asset>(&mut self, path: &Path) -> Option<Arc<T>> {
        let handle = self.handle_for_path(path);
        if !handle.is_valid() {
            return None;
        }
        self.get_asset::<T>(handle)
    }

    /// Registers a new on-disk asset named `file_name` in `directory` and
    /// writes it to disk through its codec.
    ///
    /// If the file name has no extension, the preferred extension of the
    /// asset type is appended. If a file with that name already exists, the
    /// first free name of the form `"<stem> (NN)<ext>"` is used instead.
    pub fn create_new_asset<T: Asset>(&mut self, file_name: &str, directory: &Path, asset: T) -> Arc<T> {
        let asset_type = T::static_type();
        let handle = self.mint_handle();

        let mut file_name = file_name.to_string();
        if Path::new(&file_name).extension().is_none() {
            if let Some(ext) = self.classifier.preferred_extension(asset_type) {
                file_name.push_str(ext);
            }
        }

        let relative = if directory.as_os_str().is_empty() || directory == Path::new(".") {
            self.library.relative_path(Path::new(&file_name))
        } else {
            self.library.relative_path(&directory.join(&file_name))
        };
        let relative = self.library.available_path(&relative);

        let metadata = AssetMetadata {
            handle,
            asset_type,
            file_path: relative,
            is_data_loaded: true,
        };

        match self.registry.insert(metadata.clone()) {
            Ok(Some(replaced)) => warn!(
                "New asset {:?} replaced stale registry entry {}",
                metadata.file_path, replaced.handle
            ),
            Ok(None) => {}
            Err(e) => error!("Cannot register new asset {:?}: {}", metadata.file_path, e),
        }
        self.persist();

        let asset = Arc::new(asset);
        self.loaded.insert(handle, asset.clone());
        self.importer.serialize(&metadata, asset.as_ref());

        info!("Created new {} asset {:?} ({})", asset_type, metadata.file_path, handle);

        asset
    }

    /// Stores `asset` in memory only. The returned handle never appears in
    /// the registry.
    pub fn create_memory_only_asset<T: Asset>(&mut self, asset: T) -> AssetHandle {
        let handle = self.mint_handle();
        self.memory.insert(handle, Arc::new(asset));
        handle
    }

    /// Writes the loaded instance of `handle` back to its file.
    pub fn save_asset(&self, handle: AssetHandle) -> bool {
        let metadata = match self.registry.get_by_handle(handle) {
            Some(t) => t,
            None => {
                warn!("Cannot save asset {}, it is not registered", handle);
                return false;
            }
        };

        let asset = match self.loaded.get_shared(handle) {
            Some(t) => t,
            None => {
                warn!("Cannot save asset {:?}, it is not loaded", metadata.file_path);
                return false;
            }
        };

        match self.importer.try_serialize(metadata, asset.as_ref()) {
            Ok(()) => true,
            Err(e) => {
                error!("Cannot save asset {:?}: {}", metadata.file_path, e);
                false
            }
        }
    }

    /// Handles a file moved by the editor. The handle is preserved.
    pub fn on_asset_moved(&mut self, handle: AssetHandle, new_path: &Path) -> bool {
        self.relocate(handle, new_path)
    }

    /// Handles a file renamed by the editor. The handle is preserved.
    pub fn on_asset_renamed(&mut self, handle: AssetHandle, new_path: &Path) -> bool {
        self.relocate(handle, new_path)
    }

    /// Handles a directory moved or renamed by the editor. Every asset
    /// under `from` keeps its handle and is moved below `to`.
    ///
    /// Returns the number of moved assets.
    pub fn on_directory_moved(&mut self, from: &Path, to: &Path) -> usize {
        let from = self.registry.key(from);
        let to = self.registry.key(to);

        let moves: Vec<(AssetHandle, PathBuf)> = self
            .registry
            .iter()
            .filter_map(|m| {
                let rest = m.file_path.strip_prefix(&from).ok()?;
                if rest.as_os_str().is_empty() {
                    return None;
                }
                Some((m.handle, to.join(rest)))
            })
            .collect();

        let moved = moves
            .iter()
            .filter(|(handle, path)| self.move_entry(*handle, path))
            .count();

        if moved > 0 {
            debug!("Moved {} assets from directory {:?} to {:?}", moved, from, to);
            self.persist();
        }

        moved
    }

    fn relocate(&mut self, handle: AssetHandle, new_path: &Path) -> bool {
        if !self.move_entry(handle, new_path) {
            return false;
        }

        self.persist();
        true
    }

    fn move_entry(&mut self, handle: AssetHandle, new_path: &Path) -> bool {
        let mut metadata = match self.registry.remove_handle(handle) {
            Some(t) => t,
            None => return false,
        };

        let from = std::mem::replace(&mut metadata.file_path, self.registry.key(new_path));

        if let Some(other) = self.registry.get(&metadata.file_path) {
            warn!(
                "Asset {} at {:?} is replaced by moved asset {}",
                other.handle, metadata.file_path, handle
            );
        }

        let to = metadata.file_path.clone();
        if let Err(e) = self.registry.insert(metadata) {
            error!("Cannot move asset {} to {:?}: {}", handle, to, e);
            return false;
        }

        debug!("Asset {} moved from {:?} to {:?}", handle, from, to);
        true
    }

    /// Handles a file deleted by the editor.
    ///
    /// Only the registry entry is removed; an already loaded instance stays
    /// in the loaded cache.
    pub fn on_asset_deleted(&mut self, handle: AssetHandle) -> bool {
        match self.registry.remove_handle(handle) {
            Some(metadata) => {
                debug!("Asset {} at {:?} deleted", handle, metadata.file_path);
                self.persist();
                true
            }
            None => false,
        }
    }

    pub fn handle_for_path(&self, path: &Path) -> AssetHandle {
        self.registry
            .get(path)
            .map(|m| m.handle)
            .unwrap_or(AssetHandle::INVALID)
    }

    pub fn metadata(&self, handle: AssetHandle) -> Option<&AssetMetadata> {
        self.registry.get_by_handle(handle)
    }

    pub fn metadata_for_path(&self, path: &Path) -> Option<&AssetMetadata> {
        self.registry.get(path)
    }

    /// Absolute path of the file backing `handle`.
    pub fn path(&self, handle: AssetHandle) -> Option<PathBuf> {
        self.registry
            .get_by_handle(handle)
            .map(|m| self.library.disk_path(&m.file_path))
    }

    pub fn relative_path(&self, path: &Path) -> PathBuf {
        self.library.relative_path(path)
    }

    pub fn asset_type_for_extension(&self, extension: &str) -> AssetType {
        self.classifier.classify_extension(extension)
    }

    pub fn is_asset_handle_valid(&self, handle: AssetHandle) -> bool {
        self.is_memory_asset(handle) || self.registry.contains_handle(handle)
    }

    pub fn is_memory_asset(&self, handle: AssetHandle) -> bool {
        self.memory.contains(handle)
    }

    /// Texture import settings from the sidecar next to the asset file.
    pub fn texture_settings(&self, handle: AssetHandle) -> Option<TextureImportSettings> {
        self.path(handle).map(|p| read_texture_settings(&p))
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    pub fn library(&self) -> &Library {
        &self.library
    }

    #[inline]
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    #[inline]
    pub fn memory_count(&self) -> usize {
        self.memory.len()
    }

    /// Writes the registry to the registry file.
    pub fn serialize_registry(&self) -> Result<(), RegistryError> {
        self.database.flush(&self.registry)
    }

    fn persist(&self) {
        if let Err(e) = self.serialize_registry() {
            error!("Cannot save asset registry: {}", e);
        }
    }

    /// Replaces the registry with the contents of the registry file.
    ///
    /// Stored entries with an invalid handle or type are dropped. Entries
    /// whose file is missing are relocated with the recovery heuristic, or
    /// dropped when no candidate is found. A missing registry file yields an
    /// empty registry.
    pub fn deserialize_registry(&mut self) -> Result<LoadReport, RegistryError> {
        info!("Loading asset registry...");

        let mut report = LoadReport::default();

        let records = match self.database.load()? {
            Some(t) => t,
            None => {
                warn!("Asset registry {:?} not found!", self.database.file());
                self.registry.clear();
                return Ok(report);
            }
        };

        self.registry.clear();
        let mut missing = vec![];

        for record in records {
            let mut metadata = match record.to_metadata() {
                Ok(t) => t,
                Err(e) => {
                    warn!("Registry entry {:?} is invalid: {}", record.file_path, e);
                    report.rejected.push(RejectedEntry {
                        record,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if !metadata.handle.is_valid() || metadata.asset_type.is_none() {
                warn!("Handle or type for asset {:?} is invalid!", record.file_path);
                report.rejected.push(RejectedEntry {
                    record,
                    reason: "invalid handle or type".into(),
                });
                continue;
            }

            metadata.file_path = self.registry.key(&metadata.file_path);

            if self.library.exists(&metadata.file_path) {
                self.restore(metadata, record, &mut report);
            } else {
                missing.push((metadata, record));
            }
        }

        for (mut metadata, record) in missing {
            warn!("Missing registry asset {:?}, trying to locate...", metadata.file_path);

            let registry = &self.registry;
            let relocation = recovery::locate(&self.library, &metadata.file_path, |p| registry.contains(p));

            match relocation {
                Some(relocation) => {
                    info!(
                        "Relocated asset {} from {:?} to {:?}",
                        metadata.handle, metadata.file_path, relocation.path
                    );
                    report.recovered.push(RecoveredEntry {
                        handle: metadata.handle,
                        from: metadata.file_path.clone(),
                        to: relocation.path.clone(),
                    });
                    metadata.file_path = relocation.path;
                    self.restore(metadata, record, &mut report);
                }
                None => {
                    error!(
                        "Failed to locate a candidate for {:?}, asset {} is lost",
                        metadata.file_path, metadata.handle
                    );
                    report.orphaned.push(OrphanedEntry {
                        handle: metadata.handle,
                        asset_type: metadata.asset_type,
                        file_path: metadata.file_path,
                    });
                }
            }
        }

        report.loaded = self.registry.len();
        info!("Loaded {} asset entries from registry", report.loaded);

        Ok(report)
    }

    fn restore(&mut self, mut metadata: AssetMetadata, record: RegistryRecord, report: &mut LoadReport) {
        metadata.is_data_loaded = self.loaded.contains(metadata.handle);

        match self.registry.insert(metadata) {
            Ok(Some(replaced)) => {
                warn!(
                    "Registry entries {} and {} share path {:?}, dropping {}",
                    replaced.handle, record.handle, replaced.file_path, replaced.handle
                );
                report.rejected.push(RejectedEntry {
                    record: RegistryRecord::from_metadata(&replaced),
                    reason: format!("duplicate path, superseded by handle {}", record.handle),
                });
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Registry entry {:?} is invalid: {}", record.file_path, e);
                report.rejected.push(RejectedEntry {
                    record,
                    reason: e.to_string(),
                });
            }
        }
    }
}
