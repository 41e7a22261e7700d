//! Asset type tags and classification of files by their extension.

use crate::error::RegistryError;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Enum representing the closed set of asset kinds known to the engine.
///
/// `None` is only used as a result of classification and is never stored
/// in the registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum AssetType {
    None = 0,
    Texture = 1,
    Font = 2,
    Scene = 3,
    Model = 4,
    Script = 5,
    EnvironmentMap = 6,
    Material = 7,
    Prefab = 8,
}

impl AssetType {
    pub const ALL: [AssetType; 9] = [
        AssetType::None,
        AssetType::Texture,
        AssetType::Font,
        AssetType::Scene,
        AssetType::Model,
        AssetType::Script,
        AssetType::EnvironmentMap,
        AssetType::Material,
        AssetType::Prefab,
    ];

    /// Name of the type as stored in the registry file.
    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::None => "None",
            AssetType::Texture => "Texture",
            AssetType::Font => "Font",
            AssetType::Scene => "Scene",
            AssetType::Model => "Model",
            AssetType::Script => "Script",
            AssetType::EnvironmentMap => "Environment Map",
            AssetType::Material => "Material",
            AssetType::Prefab => "Prefab",
        }
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == AssetType::None
    }
}

impl Default for AssetType {
    fn default() -> Self {
        AssetType::None
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownType(s.to_string()))
    }
}

/// Table mapping file extensions (including the leading dot) to asset types.
///
/// Lookup is exact and case-sensitive. Unknown extensions classify as
/// [`AssetType::None`].
pub struct Classifier {
    extensions: HashMap<String, AssetType>,
    preferred: HashMap<AssetType, String>,
}

impl Classifier {
    /// Creates a classifier with no known extensions.
    pub fn empty() -> Self {
        Self {
            extensions: HashMap::new(),
            preferred: HashMap::new(),
        }
    }

    /// Registers `extension` as belonging to `asset_type`. The first
    /// extension registered for a type becomes its preferred extension.
    pub fn register<S: Into<String>>(&mut self, extension: S, asset_type: AssetType) {
        let extension = extension.into();
        self.preferred
            .entry(asset_type)
            .or_insert_with(|| extension.clone());
        self.extensions.insert(extension, asset_type);
    }

    /// Classifies the extension (`".png"`, with the dot).
    pub fn classify_extension(&self, extension: &str) -> AssetType {
        self.extensions
            .get(extension)
            .copied()
            .unwrap_or(AssetType::None)
    }

    /// Classifies the file by the extension of its final path component.
    pub fn classify(&self, path: &Path) -> AssetType {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) => self.classify_extension(&format!(".{}", ext)),
            None => AssetType::None,
        }
    }

    /// Returns the extension used when creating new files of `asset_type`.
    pub fn preferred_extension(&self, asset_type: AssetType) -> Option<&str> {
        self.preferred.get(&asset_type).map(String::as_str)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        let mut classifier = Classifier::empty();

        // engine formats
        classifier.register(".venus", AssetType::Scene);
        classifier.register(".vsmat", AssetType::Material);

        // models
        classifier.register(".obj", AssetType::Model);
        classifier.register(".fbx", AssetType::Model);
        classifier.register(".gltf", AssetType::Model);
        classifier.register(".dae", AssetType::Model);
        classifier.register(".3ds", AssetType::Model);

        // textures
        classifier.register(".png", AssetType::Texture);
        classifier.register(".jpg", AssetType::Texture);
        classifier.register(".jpeg", AssetType::Texture);
        classifier.register(".tga", AssetType::Texture);

        classifier.register(".hdr", AssetType::EnvironmentMap);
        classifier.register(".cs", AssetType::Script);
        classifier.register(".ttf", AssetType::Font);

        classifier
    }
}

#[cfg(test)]
mod tests {
    use crate::error::RegistryError;
    use crate::kind::{AssetType, Classifier};
    use std::path::Path;

    #[test]
    fn type_names_round_trip() {
        for t in AssetType::ALL.iter() {
            assert_eq!(t.as_str().parse::<AssetType>().unwrap(), *t);
        }
        assert_eq!(AssetType::EnvironmentMap.as_str(), "Environment Map");
    }

    #[test]
    fn unknown_type_name_is_an_error() {
        match "Sound".parse::<AssetType>() {
            Err(RegistryError::UnknownType(name)) => assert_eq!(name, "Sound"),
            _ => panic!("expected unknown type error"),
        }
        assert!("texture".parse::<AssetType>().is_err());
    }

    #[test]
    fn classifies_known_extensions() {
        let classifier = Classifier::default();

        assert_eq!(classifier.classify(Path::new("a/b.png")), AssetType::Texture);
        assert_eq!(classifier.classify(Path::new("sword.obj")), AssetType::Model);
        assert_eq!(classifier.classify(Path::new("x.gltf")), AssetType::Model);
        assert_eq!(classifier.classify(Path::new("sky.hdr")), AssetType::EnvironmentMap);
        assert_eq!(classifier.classify(Path::new("m.vsmat")), AssetType::Material);
        assert_eq!(classifier.classify(Path::new("Player.cs")), AssetType::Script);
        assert_eq!(classifier.classify(Path::new("font.ttf")), AssetType::Font);
        assert_eq!(classifier.classify(Path::new("scenes/Main.venus")), AssetType::Scene);
    }

    #[test]
    fn classification_is_case_sensitive_and_exact() {
        let classifier = Classifier::default();

        assert_eq!(classifier.classify(Path::new("a.PNG")), AssetType::None);
        assert_eq!(classifier.classify(Path::new("readme.txt")), AssetType::None);
        assert_eq!(classifier.classify(Path::new("noext")), AssetType::None);
        assert_eq!(classifier.classify(Path::new("a.png.meta")), AssetType::None);
        assert_eq!(classifier.classify_extension("png"), AssetType::None);
    }

    #[test]
    fn first_registered_extension_is_preferred() {
        let classifier = Classifier::default();

        assert_eq!(classifier.preferred_extension(AssetType::Material), Some(".vsmat"));
        assert_eq!(classifier.preferred_extension(AssetType::Model), Some(".obj"));
        assert_eq!(classifier.preferred_extension(AssetType::Scene), Some(".venus"));
        assert_eq!(classifier.preferred_extension(AssetType::Prefab), None);
        assert_eq!(classifier.preferred_extension(AssetType::None), None);
    }
}
