//! The review file written before any remote change.

use crate::error::{Error, Result};
use crate::secret::SecretValue;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the review file inside the base directory.
pub const REVIEW_FILE_NAME: &str = "updated_secret.json";

/// Write `merged` as indented JSON to `<dir>/updated_secret.json`.
///
/// An existing file is replaced. On Unix the file is owner read/write only.
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be written.
pub fn write_review_file(dir: &Path, merged: &SecretValue) -> Result<PathBuf> {
    let path = dir.join(REVIEW_FILE_NAME);
    let content = merged.to_pretty_json()?;

    let mut file = open_private(&path).map_err(|e| Error::io("write", &path, e))?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| Error::io("write", &path, e))?;

    tracing::debug!(path = %path.display(), keys = merged.len(), "Wrote review file");
    Ok(path)
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::File::create(path)
}
