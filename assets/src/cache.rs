//! Storage for live asset instances keyed by their handle.

use crate::codec::{Asset, SharedAsset};
use crate::handle::AssetHandle;
use log::warn;
use std::collections::HashMap;
use std::sync::Arc;

/// Container of type-erased asset instances.
///
/// The cache holds one strong reference to every instance it contains, so
/// an instance stays alive for as long as it is cached regardless of what
/// callers do with the references they receive. There is no eviction:
/// entries live until they are removed explicitly or the cache is cleared.
#[derive(Default)]
pub struct AssetCache {
    assets: HashMap<AssetHandle, SharedAsset>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, handle: AssetHandle) -> bool {
        self.assets.contains_key(&handle)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn insert(&mut self, handle: AssetHandle, asset: SharedAsset) -> Option<SharedAsset> {
        self.assets.insert(handle, asset)
    }

    pub fn get_shared(&self, handle: AssetHandle) -> Option<SharedAsset> {
        self.assets.get(&handle).cloned()
    }

    /// Returns the cached instance downcast to `T`.
    ///
    /// If the instance is of a different concrete type this returns `None`.
    pub fn get<T: Asset>(&self, handle: AssetHandle) -> Option<Arc<T>> {
        let asset = self.get_shared(handle)?;
        let actual = asset.asset_type();

        match asset.downcast_arc::<T>() {
            Ok(t) => Some(t),
            Err(_) => {
                warn!(
                    "Asset {} is a {} and cannot be accessed as {}",
                    handle,
                    actual,
                    std::any::type_name::<T>()
                );
                None
            }
        }
    }

    pub fn clear(&mut self) {
        self.assets.clear();
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::AssetCache;
    use crate::codec::Asset;
    use crate::handle::AssetHandle;
    use crate::kind::AssetType;
    use std::sync::Arc;

    struct Scene(u32);

    impl Asset for Scene {
        fn static_type() -> AssetType {
            AssetType::Scene
        }

        fn asset_type(&self) -> AssetType {
            AssetType::Scene
        }
    }

    struct Font;

    impl Asset for Font {
        fn static_type() -> AssetType {
            AssetType::Font
        }

        fn asset_type(&self) -> AssetType {
            AssetType::Font
        }
    }

    #[test]
    fn returns_same_instance() {
        let mut cache = AssetCache::new();
        let handle = AssetHandle::generate();
        cache.insert(handle, Arc::new(Scene(3)));

        let a = cache.get::<Scene>(handle).unwrap();
        let b = cache.get::<Scene>(handle).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.0, 3);
    }

    #[test]
    fn wrong_type_yields_none() {
        let mut cache = AssetCache::new();
        let handle = AssetHandle::generate();
        cache.insert(handle, Arc::new(Scene(1)));

        assert!(cache.get::<Font>(handle).is_none());
        assert!(cache.get::<Scene>(handle).is_some());
    }

    #[test]
    fn missing_and_cleared_entries() {
        let mut cache = AssetCache::new();
        let handle = AssetHandle::generate();

        assert!(cache.get::<Font>(handle).is_none());

        cache.insert(handle, Arc::new(Font));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.contains(handle));
    }
}
