//! Relocation of registry entries whose file disappeared from its stored path.
//!
//! When a file is moved outside of the editor the registry still points to
//! the old location. Every file under the asset root with the same file name
//! is a candidate; each candidate is scored by the number of its path
//! components that occur somewhere in the stored path and the best scoring
//! candidate wins.

use crate::library::{to_registry_string, Library};
use log::{debug, trace};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// The candidate chosen for a missing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    /// New root-relative path of the file.
    pub path: PathBuf,
    pub score: u32,
    /// Number of files that had a matching file name.
    pub candidates: usize,
}

/// Counts how many `/` or `\` delimited tokens of `candidate` occur as
/// substrings of `stored`.
pub fn score(stored: &str, candidate: &str) -> u32 {
    candidate
        .split(|c| c == '/' || c == '\\')
        .filter(|token| !token.is_empty())
        .filter(|token| stored.contains(token))
        .count() as u32
}

/// Compares two scored candidates, `Greater` meaning `a` is preferred.
///
/// Higher score wins; equal scores prefer the shorter path and then the
/// lexicographically smaller one.
fn preference(a: (u32, &str), b: (u32, &str)) -> Ordering {
    a.0.cmp(&b.0)
        .then_with(|| b.1.len().cmp(&a.1.len()))
        .then_with(|| b.1.cmp(a.1))
}

/// Searches the asset root for the most likely new location of `stored`.
///
/// Files for which `is_taken` returns `true` are not considered. Returns
/// `None` if no candidate scores above zero.
pub fn locate<F>(library: &Library, stored: &Path, is_taken: F) -> Option<Relocation>
where
    F: Fn(&Path) -> bool,
{
    let file_name = stored.file_name()?;
    let stored = to_registry_string(stored);

    let mut best: Option<(u32, String)> = None;
    let mut candidates = 0;

    for disk_path in library.files(library.root()) {
        if disk_path.file_name() != Some(file_name) {
            continue;
        }

        let relative = library.relative_path(&disk_path);
        if is_taken(&relative) {
            trace!("Skipping candidate {:?}, already registered", relative);
            continue;
        }

        let relative = to_registry_string(&relative);
        let candidate_score = score(&stored, &relative);
        candidates += 1;

        if candidates > 1 {
            trace!("Multiple candidates found for '{}'...", stored);
        }

        best = match best {
            None => Some((candidate_score, relative)),
            Some((best_score, best_path)) => {
                match preference((candidate_score, &relative), (best_score, &best_path)) {
                    Ordering::Greater => {
                        if candidate_score == best_score {
                            debug!(
                                "Candidates '{}' and '{}' for '{}' tie with score {}, preferring '{}'",
                                best_path, relative, stored, best_score, relative
                            );
                        }
                        Some((candidate_score, relative))
                    }
                    _ => Some((best_score, best_path)),
                }
            }
        };
    }

    match best {
        Some((score, path)) if score > 0 => {
            trace!("Found most likely candidate '{}' for '{}'", path, stored);
            Some(Relocation {
                path: PathBuf::from(path),
                score,
                candidates,
            })
        }
        _ => None,
    }
}
