//! Filesystem utilities.
//!
//! Helper functions for file operations.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{CrassError, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Ensure the parent directory of a file path exists.
pub fn ensure_parent(path: impl AsRef<Path>) -> Result<()> {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Copy every file under `source` into `dest`, keeping relative layout.
///
/// Existing files are overwritten. Returns the copied destination paths.
pub fn copy_tree(source: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    if !source.is_dir() {
        return Err(CrassError::NotFound(format!(
            "include directory {} does not exist",
            source.display()
        )));
    }

    let mut copied = Vec::new();
    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(|err| {
            CrassError::Config(format!("walk {}: {err}", source.display()))
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|err| CrassError::Config(format!("strip prefix: {err}")))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else {
            ensure_parent(&target)?;
            std::fs::copy(entry.path(), &target)?;
            debug!(from = %entry.path().display(), to = %target.display(), "copied include");
            copied.push(target);
        }
    }
    Ok(copied)
}
