use crate::database::DEFAULT_REGISTRY_NAME;
use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the environment variable pointing to the settings file.
pub const SETTINGS_ENV: &str = "ASSET_SETTINGS";

const DEFAULT_SETTINGS_FILE: &str = "./asset_settings.json";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Settings {
    /// The root folder that contains all asset files.
    pub asset_root: PathBuf,

    /// Path to the registry file. Defaults to `assets.vsreg` inside the
    /// asset root.
    #[serde(default)]
    pub registry_file: Option<PathBuf>,

    /// Whether to watch the file system for changes.
    #[serde(default)]
    pub watch: bool,
}

impl Settings {
    pub fn new<P: Into<PathBuf>>(asset_root: P) -> Self {
        Self {
            asset_root: asset_root.into(),
            registry_file: None,
            watch: false,
        }
    }

    /// Loads settings from the file named by `ASSET_SETTINGS`, or from
    /// `./asset_settings.json` when the variable is not set.
    pub fn load() -> Result<Self, SettingsError> {
        let path = std::env::var(SETTINGS_ENV).unwrap_or_else(|_| DEFAULT_SETTINGS_FILE.into());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(serde_json::from_str(&json)?)
    }

    pub fn registry_path(&self) -> PathBuf {
        match self.registry_file {
            Some(ref t) => t.clone(),
            None => self.asset_root.join(DEFAULT_REGISTRY_NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::SettingsError;
    use crate::settings::Settings;
    use std::path::PathBuf;

    #[test]
    fn registry_defaults_to_asset_root() {
        let settings = Settings::new("/game/assets");
        assert_eq!(settings.registry_path(), PathBuf::from("/game/assets/assets.vsreg"));
    }

    #[test]
    fn loads_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{ "asset_root": "/game/assets", "registry_file": "/tmp/reg.vsreg" }"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.asset_root, PathBuf::from("/game/assets"));
        assert_eq!(settings.registry_path(), PathBuf::from("/tmp/reg.vsreg"));
        assert!(!settings.watch);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Settings::load_from(&dir.path().join("nope.json")),
            Err(SettingsError::Io { .. })
        ));
    }
}
