//! Library scanning functionality.

use crate::handle::AssetHandle;
use crate::library::Library;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of offering one file to the importer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The file was already registered under this handle.
    Tracked(AssetHandle),
    /// The file was registered under a freshly minted handle.
    Imported(AssetHandle),
    /// The file extension does not belong to any asset type.
    Unsupported,
}

impl ImportOutcome {
    pub fn handle(self) -> AssetHandle {
        match self {
            ImportOutcome::Tracked(t) | ImportOutcome::Imported(t) => t,
            ImportOutcome::Unsupported => AssetHandle::INVALID,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResults {
    pub scanned: usize,
    pub imported: usize,
    pub tracked: usize,
    pub unsupported: usize,
}

/// Walks `dir` recursively and offers every file to `import`.
///
/// The scan is additive: it never removes registry entries for files that
/// no longer exist.
pub fn scan_directory<F>(library: &Library, dir: &Path, mut import: F) -> ScanResults
where
    F: FnMut(&Path) -> ImportOutcome,
{
    let mut results = ScanResults::default();

    for path in library.files(dir) {
        results.scanned += 1;

        match import(&path) {
            ImportOutcome::Tracked(_) => results.tracked += 1,
            ImportOutcome::Imported(_) => results.imported += 1,
            ImportOutcome::Unsupported => results.unsupported += 1,
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use crate::handle::AssetHandle;
    use crate::library::Library;
    use crate::scanner::{scan_directory, ImportOutcome};
    use std::path::PathBuf;

    #[test]
    fn every_file_is_offered_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("textures/nested")).unwrap();
        std::fs::write(dir.path().join("textures/nested/a.png"), b"").unwrap();
        std::fs::write(dir.path().join("textures/b.png"), b"").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"").unwrap();

        let library = Library::new(dir.path());
        let mut offered: Vec<PathBuf> = vec![];

        let results = scan_directory(&library, library.root(), |path| {
            offered.push(library.relative_path(path));
            match path.extension().and_then(|e| e.to_str()) {
                Some("png") if offered.len() == 1 => ImportOutcome::Tracked(AssetHandle::from_raw(1)),
                Some("png") => ImportOutcome::Imported(AssetHandle::from_raw(2)),
                _ => ImportOutcome::Unsupported,
            }
        });

        offered.sort();
        assert_eq!(
            offered,
            vec![
                PathBuf::from("readme.txt"),
                PathBuf::from("textures/b.png"),
                PathBuf::from("textures/nested/a.png"),
            ]
        );
        assert_eq!(results.scanned, 3);
        assert_eq!(results.unsupported, 1);
        assert_eq!(results.tracked + results.imported, 2);
    }

    #[test]
    fn outcome_handles() {
        assert_eq!(ImportOutcome::Unsupported.handle(), AssetHandle::INVALID);
        assert_eq!(
            ImportOutcome::Imported(AssetHandle::from_raw(4)).handle(),
            AssetHandle::from_raw(4)
        );
    }
}
