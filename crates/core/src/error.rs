//! Error type shared by every secmerge workflow.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for secmerge operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A region code outside the supported set
    #[error("Unknown region code '{code}'")]
    #[diagnostic(
        code(secmerge::region::unknown),
        help("Supported region codes are: us, ca, uk")
    )]
    UnknownRegion {
        /// The code that was given
        code: String,
    },

    /// The remote secret store rejected or failed a call
    #[error("Secret store {operation} failed for '{secret_id}': {message}")]
    #[diagnostic(
        code(secmerge::store),
        help("Check your AWS credentials, region, and permissions on the secret")
    )]
    Store {
        /// Store operation name (list, get, put, move-stage)
        operation: &'static str,
        /// Secret the call targeted (empty for listings)
        secret_id: String,
        /// Message reported by the store
        message: String,
    },

    /// The current secret value is not a flat JSON object
    #[error("Secret '{secret_id}' is not a JSON object: {message}")]
    #[diagnostic(code(secmerge::secret::invalid_json))]
    InvalidSecretJson {
        /// Secret name or ARN
        secret_id: String,
        /// What was wrong with the body
        message: String,
    },

    /// The region has no secrets to choose from
    #[error("No secrets found in region '{region}'")]
    #[diagnostic(code(secmerge::selection::empty))]
    NoSecrets {
        /// AWS region identifier
        region: String,
    },

    /// The override file does not exist
    #[error("Override file not found: {}", path.display())]
    #[diagnostic(
        code(secmerge::overrides::missing),
        help("Paths are resolved relative to the base directory (--base-dir)")
    )]
    MissingOverrideFile {
        /// Resolved path
        path: PathBuf,
    },

    /// There is no version staged as previous
    #[error("Secret '{secret_id}' has no previous version to roll back to")]
    #[diagnostic(code(secmerge::rollback::no_previous))]
    NoPreviousVersion {
        /// Secret name or ARN
        secret_id: String,
    },

    /// Local file I/O failed
    #[error("I/O {operation} failed on {}: {source}", path.display())]
    #[diagnostic(code(secmerge::io))]
    Io {
        /// File involved
        path: PathBuf,
        /// What was attempted (read, write)
        operation: &'static str,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// An interactive prompt could not be shown or answered
    #[error("Prompt failed: {message}")]
    #[diagnostic(code(secmerge::prompt))]
    Prompt {
        /// What went wrong
        message: String,
    },

    /// The operator aborted a prompt
    #[error("Aborted by operator")]
    #[diagnostic(code(secmerge::prompt::aborted))]
    Aborted,

    /// JSON encoding of the merged secret failed
    #[error("Serialization failed: {0}")]
    #[diagnostic(code(secmerge::serialization))]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build a store error.
    pub fn store(
        operation: &'static str,
        secret_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Store {
            operation,
            secret_id: secret_id.into(),
            message: message.into(),
        }
    }

    /// Build a prompt error.
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt {
            message: message.into(),
        }
    }

    /// Build an I/O error for `path`.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            operation,
            source,
        }
    }
}

/// Result type alias for secmerge operations
pub type Result<T> = std::result::Result<T, Error>;
