//! Directory housekeeping around stored files.

use std::fs;
use std::io;
use std::path::Path;

/// Create every missing parent directory of `path`.
///
/// # Errors
///
/// Returns the underlying I/O error if a directory cannot be created.
pub fn create_source_path_directory(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Remove `directory` and its ancestors while they are empty, stopping at
/// `root`.
///
/// Does nothing unless `directory` lies strictly inside `root`. Stops at
/// the first non-empty directory or the first directory that cannot be
/// removed.
pub fn delete_empty_directories(directory: &Path, root: &Path) {
    if !directory.is_dir() || directory == root || !directory.starts_with(root) {
        return;
    }

    let mut current = directory;
    while current != root {
        let is_empty = match fs::read_dir(current) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => return,
        };
        if !is_empty {
            return;
        }
        if let Err(err) = fs::remove_dir(current) {
            tracing::debug!(path = %current.display(), "could not remove empty directory: {err}");
            return;
        }
        tracing::debug!(path = %current.display(), "removed empty directory");

        match current.parent() {
            Some(parent) => current = parent,
            None => return,
        }
    }
}
