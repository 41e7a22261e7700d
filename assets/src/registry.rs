//! In-memory path → metadata index of all on-disk assets.

use crate::error::RegistryError;
use crate::handle::AssetHandle;
use crate::library::Library;
use crate::metadata::AssetMetadata;
use log::warn;
use std::collections::hash_map::{Entry, Values};
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

/// Mapping from root-relative path to asset metadata with a secondary
/// handle index.
///
/// Every method canonicalizes the path it receives with
/// [`Library::relative_path`] first. The stored metadata always has its
/// `file_path` equal to its key and every valid handle maps back to exactly
/// one key.
pub struct Registry {
    library: Library,
    entries: HashMap<PathBuf, AssetMetadata>,
    handles: HashMap<AssetHandle, PathBuf>,
}

impl Registry {
    pub fn new(library: Library) -> Self {
        Self {
            library,
            entries: HashMap::new(),
            handles: HashMap::new(),
        }
    }

    /// Returns the canonical key for `path`.
    #[inline]
    pub fn key(&self, path: &Path) -> PathBuf {
        self.library.relative_path(path)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(&self.key(path))
    }

    pub fn contains_handle(&self, handle: AssetHandle) -> bool {
        self.handles.contains_key(&handle)
    }

    pub fn get(&self, path: &Path) -> Option<&AssetMetadata> {
        self.entries.get(&self.key(path))
    }

    pub fn get_by_handle(&self, handle: AssetHandle) -> Option<&AssetMetadata> {
        self.handles.get(&handle).and_then(|key| self.entries.get(key))
    }

    /// Mutable access to the metadata of `handle`. The handle itself cannot
    /// be changed through this reference; use [`Registry::entry`] for that.
    pub(crate) fn loaded_flag_mut(&mut self, handle: AssetHandle) -> Option<&mut bool> {
        let key = self.handles.get(&handle)?;
        self.entries.get_mut(key).map(|m| &mut m.is_data_loaded)
    }

    /// Returns mutable access to the entry for `path`, creating a
    /// default-constructed entry if there is none.
    ///
    /// The caller is responsible for populating a freshly created entry. The
    /// handle index is updated when the returned guard is dropped.
    pub fn entry(&mut self, path: &Path) -> EntryMut<'_> {
        let key = self.key(path);
        let previous = match self.entries.entry(key.clone()) {
            Entry::Occupied(t) => t.get().handle,
            Entry::Vacant(t) => {
                t.insert(AssetMetadata {
                    file_path: key.clone(),
                    ..AssetMetadata::default()
                });
                AssetHandle::INVALID
            }
        };

        EntryMut {
            registry: self,
            key,
            previous,
        }
    }

    /// Inserts `metadata` under its own `file_path`, replacing any entry
    /// stored under the same key.
    ///
    /// Fails if the handle is already registered under another path.
    pub fn insert(&mut self, mut metadata: AssetMetadata) -> Result<Option<AssetMetadata>, RegistryError> {
        let key = self.key(&metadata.file_path);

        if let Some(existing) = self.handles.get(&metadata.handle) {
            if *existing != key {
                return Err(RegistryError::DuplicateHandle {
                    handle: metadata.handle,
                    existing: existing.clone(),
                });
            }
        }

        metadata.file_path = key.clone();
        let handle = metadata.handle;

        let replaced = self.entries.insert(key.clone(), metadata);
        if let Some(ref old) = replaced {
            self.unindex(old);
        }
        if handle.is_valid() {
            self.handles.insert(handle, key);
        }

        Ok(replaced)
    }

    /// Removes the entry for `path`. Returns the number of removed entries.
    pub fn remove(&mut self, path: &Path) -> usize {
        let key = self.key(path);
        match self.entries.remove(&key) {
            Some(old) => {
                self.unindex(&old);
                1
            }
            None => 0,
        }
    }

    pub fn remove_handle(&mut self, handle: AssetHandle) -> Option<AssetMetadata> {
        let key = self.handles.remove(&handle)?;
        self.entries.remove(&key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.handles.clear();
    }

    pub fn iter(&self) -> Values<'_, PathBuf, AssetMetadata> {
        self.entries.values()
    }

    /// Removes the handle index entry of `old` unless the handle has since
    /// been re-registered under a different key.
    fn unindex(&mut self, old: &AssetMetadata) {
        if let Entry::Occupied(t) = self.handles.entry(old.handle) {
            if *t.get() == old.file_path {
                t.remove();
            }
        }
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a AssetMetadata;
    type IntoIter = Values<'a, PathBuf, AssetMetadata>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Mutable reference to a registry entry that keeps the handle index in
/// sync when dropped.
pub struct EntryMut<'a> {
    registry: &'a mut Registry,
    key: PathBuf,
    previous: AssetHandle,
}

impl<'a> Deref for EntryMut<'a> {
    type Target = AssetMetadata;

    fn deref(&self) -> &Self::Target {
        &self.registry.entries[&self.key]
    }
}

impl<'a> DerefMut for EntryMut<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.registry
            .entries
            .get_mut(&self.key)
            .unwrap_or_else(|| unreachable!("entry was created when the guard was made"))
    }
}

impl<'a> Drop for EntryMut<'a> {
    fn drop(&mut self) {
        let registry = &mut *self.registry;
        let metadata = match registry.entries.get_mut(&self.key) {
            Some(t) => t,
            None => return,
        };

        if metadata.file_path != self.key {
            warn!(
                "Registry entry {:?} had its path changed to {:?}, restoring key",
                self.key, metadata.file_path
            );
            metadata.file_path = self.key.clone();
        }

        let handle = metadata.handle;
        if handle == self.previous {
            return;
        }

        if let Entry::Occupied(t) = registry.handles.entry(self.previous) {
            if *t.get() == self.key {
                t.remove();
            }
        }

        if handle.is_valid() {
            if let Some(stale) = registry.handles.insert(handle, self.key.clone()) {
                if stale != self.key {
                    warn!(
                        "Handle {} moved from {:?} to {:?}, dropping stale entry",
                        handle, stale, self.key
                    );
                    registry.entries.remove(&stale);
                }
            }
        }
    }
}
