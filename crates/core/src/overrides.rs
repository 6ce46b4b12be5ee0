//! Parsing of local `key=value` override files.

use crate::error::{Error, Result};
use crate::secret::SecretValue;
use std::path::Path;

/// Parse override file content.
///
/// Each line is trimmed. Blank lines and lines without `=` are skipped, so a
/// `#` line only survives when it carries a `=` (`#FOO=bar` yields `#FOO`). The first `=` splits the key from the value, so values may
/// contain `=`. A repeated key keeps its first position and its last value.
#[must_use]
pub fn parse_overrides(content: &str) -> SecretValue {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.split_once('='))
        .collect()
}

/// Read and parse an override file.
///
/// # Errors
/// Returns [`Error::MissingOverrideFile`] if the file does not exist and
/// [`Error::Io`] for any other read failure.
pub fn load_overrides(path: &Path) -> Result<SecretValue> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let overrides = parse_overrides(&content);
            tracing::debug!(
                path = %path.display(),
                keys = overrides.len(),
                "Parsed override file"
            );
            Ok(overrides)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::MissingOverrideFile {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(Error::io("read", path, e)),
    }
}
