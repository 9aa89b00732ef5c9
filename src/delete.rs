//! Removing files and directories from disk.

use std::fs;
use std::path::Path;

use crate::cache::TreeCache;
use crate::error::{DirsizeError, Result};

/// Remove a file, link or whole directory tree. Links are never followed.
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| DirsizeError::from_io(path, e))?;

    let outcome = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    outcome.map_err(|e| DirsizeError::from_io(path, e))?;
    tracing::info!(path = %path.display(), "deleted");
    Ok(())
}

/// Delete `path` from disk, then drop it from `cache`.
///
/// The cache is only touched after a successful delete. Returns the size
/// the cache had recorded for the path.
pub fn delete_and_forget(cache: &mut TreeCache, path: &Path) -> Result<Option<u64>> {
    remove_path(path)?;
    Ok(cache.remove_subtree(path))
}
