//! Provides path functions related to the asset root directory.

use log::warn;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// The directory tree containing all on-disk assets.
///
/// Every path stored in the registry is relative to this root. The root
/// itself is kept absolute and lexically normalized so that paths coming
/// from directory walks can be reliably relativized.
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            match std::env::current_dir() {
                Ok(cwd) => cwd.join(root),
                Err(e) => {
                    warn!("Cannot resolve current directory ({}), using {:?} as-is", e, root);
                    root.to_path_buf()
                }
            }
        };

        Self {
            root: normalize(&root),
        }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Computes the registry key for `path`.
    ///
    /// Paths inside the root are made relative to it. Paths outside of the
    /// root and paths that are already relative are only lexically
    /// normalized.
    pub fn relative_path(&self, path: &Path) -> PathBuf {
        let normalized = normalize(path);
        match normalized.strip_prefix(&self.root) {
            Ok(t) => t.to_path_buf(),
            Err(_) => normalized,
        }
    }

    /// Converts a root-relative path to a path on disk.
    pub fn disk_path(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Whether a file or directory exists at the root-relative `relative` path.
    pub fn exists(&self, relative: &Path) -> bool {
        self.disk_path(relative).exists()
    }

    /// Finds a root-relative path for a new file that does not collide with
    /// an existing file.
    ///
    /// If `relative` is taken, `"<stem> (01)<ext>"`, `"<stem> (02)<ext>"`...
    /// are probed in its directory. Numbers below ten are zero-padded.
    pub fn available_path(&self, relative: &Path) -> PathBuf {
        if !self.exists(relative) {
            return relative.to_path_buf();
        }

        let stem = relative
            .file_stem()
            .map(|x| x.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = relative
            .extension()
            .map(|x| format!(".{}", x.to_string_lossy()))
            .unwrap_or_default();
        let parent = relative.parent().unwrap_or_else(|| Path::new(""));

        let mut current = 1u32;
        loop {
            let name = if current < 10 {
                format!("{} (0{}){}", stem, current, extension)
            } else {
                format!("{} ({}){}", stem, current, extension)
            };

            let candidate = parent.join(name);
            if !self.exists(&candidate) {
                return candidate;
            }

            current += 1;
        }
    }

    /// Recursively lists every non-directory entry under `dir`.
    ///
    /// Entries that cannot be read are skipped with a warning.
    pub fn files(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(t) => Some(t),
                Err(e) => {
                    warn!("Cannot read directory entry while scanning {:?}: {}", dir, e);
                    None
                }
            })
            .filter(|entry| !entry.file_type().is_dir())
            .map(|entry| entry.into_path())
            .collect()
    }
}

/// Renders a relative path with `/` separators as stored in the registry file.
pub fn to_registry_string(path: &Path) -> String {
    let mut out = String::new();

    for component in path.components() {
        match component {
            Component::RootDir => out.push('/'),
            c => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&c.as_os_str().to_string_lossy());
            }
        }
    }

    out.replace('\\', "/")
}

/// Lexically normalizes `path`: removes `.` components and resolves `..`
/// against preceding normal components without touching the file system.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            c => out.push(c),
        }
    }

    out.iter().map(|c| c.as_os_str()).collect()
}
