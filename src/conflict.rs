//! Picks a free file name inside a destination folder.

use crate::error::{OrderlyError, OrderlyResult};
use std::path::{Path, PathBuf};

/// Highest numbered suffix tried before giving up.
pub const MAX_CONFLICT_SUFFIX: u32 = 100_000;

/// Returns `dir/file_name` if nothing exists there, otherwise the first free
/// `stem (n)ext` for n = 1, 2, ...
///
/// The extension is everything from the last dot, so `archive.tar.gz` probes
/// `archive.tar (1).gz`. Names whose only dot is the first character, such as
/// `.bashrc`, have no extension.
pub fn resolve(dir: &Path, file_name: &str) -> OrderlyResult<PathBuf> {
    resolve_with_limit(dir, file_name, MAX_CONFLICT_SUFFIX)
}

/// [`resolve`] with at most `max_suffix` numbered names tried.
pub fn resolve_with_limit(dir: &Path, file_name: &str, max_suffix: u32) -> OrderlyResult<PathBuf> {
    let candidate = dir.join(file_name);
    if !exists(&candidate) {
        return Ok(candidate);
    }

    let (stem, ext) = split_extension(file_name);
    for n in 1..=max_suffix {
        let candidate = dir.join(format!("{stem} ({n}){ext}"));
        if !exists(&candidate) {
            return Ok(candidate);
        }
    }

    Err(OrderlyError::ConflictResolutionExhausted {
        dir: dir.to_path_buf(),
        filename: file_name.to_string(),
    })
}

/// Dangling symlinks count as taken.
fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Splits `name` into stem and extension (with its leading dot).
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(dot) => name.split_at(leading_dots + dot),
        None => (name, ""),
    }
}
