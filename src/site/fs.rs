//! Destructive filesystem helpers.
//!
//! The build never merges into existing output: folders are removed and
//! recreated, files are deleted before being written or copied.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::SiteError;

/// Removes `dir` with all its contents if present, then creates it empty.
///
/// # Errors
///
/// Returns `SiteError::Io` if removal or creation fails.
pub fn recreate_dir(dir: &Path) -> Result<(), SiteError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => tracing::debug!(path = %dir.display(), "removed existing folder"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(SiteError::io(dir, e)),
    }
    fs::create_dir_all(dir).map_err(|e| SiteError::io(dir, e))
}

/// Deletes a file, ignoring a missing one.
///
/// # Errors
///
/// Returns `SiteError::Io` for any failure other than the file not existing.
pub fn delete_file(path: &Path) -> Result<(), SiteError> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(SiteError::io(path, e)),
        _ => Ok(()),
    }
}

/// Replaces `to` with a copy of `from`, creating parent folders as needed.
///
/// # Errors
///
/// Returns `SiteError::Io` if the source cannot be read or the destination
/// cannot be replaced.
pub fn copy_file(from: &Path, to: &Path) -> Result<(), SiteError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
    }
    delete_file(to)?;
    fs::copy(from, to).map_err(|e| SiteError::io(from, e))?;
    Ok(())
}

/// Copies the contents of `from` into `to` recursively. Returns the number
/// of files copied.
///
/// # Errors
///
/// Returns `SiteError::Io` if `from` cannot be walked or a copy fails.
pub fn copy_tree(from: &Path, to: &Path) -> Result<usize, SiteError> {
    let mut copied = 0;

    for entry in WalkDir::new(from).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(from).to_path_buf();
            SiteError::io(path, e.into())
        })?;

        let Ok(relative) = entry.path().strip_prefix(from) else {
            continue;
        };
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| SiteError::io(&target, e))?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Copies each upload into `dir` under its own file name. A later upload
/// with the same name silently replaces an earlier one.
///
/// # Errors
///
/// Returns `SiteError::InvalidUpload` for a path without a file name and
/// `SiteError::Io` if a copy fails.
pub fn copy_uploads<P: AsRef<Path>>(uploads: &[P], dir: &Path) -> Result<usize, SiteError> {
    for upload in uploads {
        let upload = upload.as_ref();
        let name = upload.file_name().ok_or_else(|| SiteError::InvalidUpload {
            path: upload.to_path_buf(),
        })?;
        copy_file(upload, &dir.join(name))?;
        tracing::debug!(file = %upload.display(), "staged upload");
    }
    Ok(uploads.len())
}
