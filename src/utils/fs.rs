//! Filesystem utilities.
//!
//! Helper functions for file operations.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Result, SkmError};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Remove a directory tree; a missing path is not an error.
pub fn remove_dir_if_exists(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        std::fs::remove_dir_all(path)?;
    }
    Ok(())
}

/// Copy `src` into `dst` recursively, skipping any `.git` directory.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    let walker = WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(|err| {
            SkmError::Io(std::io::Error::other(format!(
                "walk {}: {err}",
                src.display()
            )))
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|err| SkmError::Io(std::io::Error::other(err.to_string())))?;
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
