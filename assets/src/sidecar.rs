//! Per-asset import settings stored next to the asset in a `.meta` file.

use crate::error::CodecError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Value reported for settings that could not be read.
pub const UNSET: i32 = -1;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(i32)]
pub enum TextureFilterMode {
    Point = 0,
    Bilinear = 1,
}

impl TryFrom<i32> for TextureFilterMode {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TextureFilterMode::Point),
            1 => Ok(TextureFilterMode::Bilinear),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(i32)]
pub enum TextureWrapMode {
    Repeat = 0,
    Mirrored = 1,
    ClampToEdge = 2,
    ClampToBorder = 3,
}

impl TryFrom<i32> for TextureWrapMode {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TextureWrapMode::Repeat),
            1 => Ok(TextureWrapMode::Mirrored),
            2 => Ok(TextureWrapMode::ClampToEdge),
            3 => Ok(TextureWrapMode::ClampToBorder),
            _ => Err(()),
        }
    }
}

/// Import settings of a texture as raw enum values.
///
/// A value of [`UNSET`] means the sidecar existed but could not be parsed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureImportSettings {
    #[serde(rename = "Filter")]
    pub filter: i32,
    #[serde(rename = "Wrap")]
    pub wrap: i32,
}

impl TextureImportSettings {
    pub fn new(filter: TextureFilterMode, wrap: TextureWrapMode) -> Self {
        Self {
            filter: filter as i32,
            wrap: wrap as i32,
        }
    }

    pub fn unset() -> Self {
        Self {
            filter: UNSET,
            wrap: UNSET,
        }
    }

    pub fn filter_mode(&self) -> Option<TextureFilterMode> {
        TextureFilterMode::try_from(self.filter).ok()
    }

    pub fn wrap_mode(&self) -> Option<TextureWrapMode> {
        TextureWrapMode::try_from(self.wrap).ok()
    }
}

impl Default for TextureImportSettings {
    fn default() -> Self {
        Self::new(TextureFilterMode::Bilinear, TextureWrapMode::Repeat)
    }
}

/// Path of the sidecar belonging to `asset_path` (`<asset_path>.meta`).
pub fn sidecar_path(asset_path: &Path) -> PathBuf {
    let mut name: OsString = asset_path.as_os_str().to_owned();
    name.push(".meta");
    PathBuf::from(name)
}

/// Reads the texture import settings of the asset at `asset_path`.
///
/// Missing sidecar gives the defaults; an unreadable or malformed sidecar
/// gives [`TextureImportSettings::unset`].
pub fn read_texture_settings(asset_path: &Path) -> TextureImportSettings {
    let path = sidecar_path(asset_path);
    if !path.exists() {
        return TextureImportSettings::default();
    }

    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|json| serde_json::from_str::<TextureImportSettings>(&json).map_err(|e| e.to_string()));

    match parsed {
        Ok(t) => t,
        Err(e) => {
            warn!("Malformed sidecar {:?}: {}", path, e);
            TextureImportSettings::unset()
        }
    }
}

pub fn write_texture_settings(asset_path: &Path, settings: &TextureImportSettings) -> Result<(), CodecError> {
    let path = sidecar_path(asset_path);
    let json = serde_json::to_string_pretty(settings).map_err(|e| CodecError::Decode(e.to_string()))?;

    std::fs::write(&path, json).map_err(|source| CodecError::Io { path, source })
}

#[cfg(test)]
mod tests {
    use crate::sidecar::{
        read_texture_settings, sidecar_path, write_texture_settings, TextureFilterMode,
        TextureImportSettings, TextureWrapMode, UNSET,
    };
    use std::path::{Path, PathBuf};

    #[test]
    fn sidecar_sits_next_to_asset() {
        assert_eq!(
            sidecar_path(Path::new("textures/wood.png")),
            PathBuf::from("textures/wood.png.meta")
        );
    }

    #[test]
    fn missing_sidecar_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = read_texture_settings(&dir.path().join("wood.png"));

        assert_eq!(settings.filter_mode(), Some(TextureFilterMode::Bilinear));
        assert_eq!(settings.wrap_mode(), Some(TextureWrapMode::Repeat));
    }

    #[test]
    fn malformed_sidecar_is_unset() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("wood.png");
        std::fs::write(sidecar_path(&asset), "Filter: [").unwrap();

        let settings = read_texture_settings(&asset);
        assert_eq!(settings.filter, UNSET);
        assert_eq!(settings.wrap, UNSET);
        assert_eq!(settings.filter_mode(), None);
    }

    #[test]
    fn written_settings_are_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("pixel.png");
        let settings = TextureImportSettings::new(TextureFilterMode::Point, TextureWrapMode::ClampToEdge);

        write_texture_settings(&asset, &settings).unwrap();

        assert_eq!(read_texture_settings(&asset), settings);
        assert_eq!(settings.filter, 0);
        assert_eq!(settings.wrap, 2);
    }
}
