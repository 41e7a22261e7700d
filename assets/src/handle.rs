//! Stable asset identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque 64-bit identifier of an asset.
///
/// Handles are generated uniformly at random and never change once assigned
/// to an asset, even when the file backing the asset is moved or renamed.
/// The value `0` is reserved and means "no asset".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetHandle(u64);

impl AssetHandle {
    /// The reserved handle that never refers to any asset.
    pub const INVALID: AssetHandle = AssetHandle(0);

    /// Generates a new random non-zero handle.
    pub fn generate() -> Self {
        loop {
            let value: u64 = rand::random();
            if value != 0 {
                return AssetHandle(value);
            }
        }
    }

    #[inline]
    pub const fn from_raw(value: u64) -> Self {
        AssetHandle(value)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for AssetHandle {
    fn default() -> Self {
        AssetHandle::INVALID
    }
}

impl From<u64> for AssetHandle {
    fn from(value: u64) -> Self {
        AssetHandle(value)
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use crate::handle::AssetHandle;
    use std::collections::HashSet;

    #[test]
    fn invalid_handle_is_zero() {
        assert_eq!(AssetHandle::INVALID.raw(), 0);
        assert!(!AssetHandle::INVALID.is_valid());
        assert_eq!(AssetHandle::default(), AssetHandle::INVALID);
    }

    #[test]
    fn generated_handles_are_valid_and_distinct() {
        let handles: HashSet<AssetHandle> = (0..1000).map(|_| AssetHandle::generate()).collect();

        assert_eq!(handles.len(), 1000);
        assert!(handles.iter().all(|h| h.is_valid()));
    }

    #[test]
    fn handle_serializes_as_plain_integer() {
        let handle = AssetHandle::from_raw(12345678901234);
        let json = serde_json::to_string(&handle).unwrap();

        assert_eq!(json, "12345678901234");
        assert_eq!(handle.to_string(), "12345678901234");
    }
}
