use clap::{Parser, Subcommand, ValueEnum};
use miette::{Diagnostic, Report};
use secmerge_aws::AwsMode;
use secmerge_core::Region;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// CLI or configuration error exit code
pub const EXIT_CLI: i32 = 2;
/// Secret store or unexpected error exit code
pub const EXIT_STORE: i32 = 3;
/// Exit code for SIGINT (128 + signal number 2)
pub const EXIT_SIGINT: i32 = 130;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// CLI or configuration error (exit code 2)
    #[error("CLI/configuration error: {message}")]
    #[diagnostic(code(secmerge::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Secret store error (exit code 3)
    #[error("Secret store error: {message}")]
    #[diagnostic(code(secmerge::cli::store))]
    Store {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Other unexpected error (exit code 3)
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(secmerge::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// The operator interrupted a prompt (exit code 130)
    #[error("Interrupted")]
    #[diagnostic(code(secmerge::cli::interrupted))]
    Interrupted,
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new store error
    #[must_use]
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }

    /// Add help text to an existing error, returning a new error with the help text set.
    #[must_use]
    pub fn with_help(self, help_text: impl Into<String>) -> Self {
        let help = Some(help_text.into());
        match self {
            Self::Config { message, .. } => Self::Config { message, help },
            Self::Store { message, .. } => Self::Store { message, help },
            Self::Other { message, .. } => Self::Other { message, help },
            Self::Interrupted => Self::Interrupted,
        }
    }
}

/// Convert `secmerge_core::Error` to appropriate `CliError` variant.
///
/// Maps error types to their appropriate CLI categories:
/// - Bad region codes and missing override files -> Config (exit code 2)
/// - Store failures and unusable remote state -> Store (exit code 3)
/// - I/O, prompt and encoding failures -> Other (exit code 3)
/// - Operator abort -> Interrupted (exit code 130)
impl From<secmerge_core::Error> for CliError {
    fn from(err: secmerge_core::Error) -> Self {
        use secmerge_core::Error;

        let help = err.help().map(|h| h.to_string());
        let message = err.to_string();
        let mapped = match err {
            Error::UnknownRegion { .. } | Error::MissingOverrideFile { .. } => {
                Self::config(message)
            }
            Error::Store { .. }
            | Error::NoSecrets { .. }
            | Error::NoPreviousVersion { .. }
            | Error::InvalidSecretJson { .. } => Self::store(message),
            Error::Io { .. } | Error::Prompt { .. } | Error::Serialization(_) => {
                Self::other(message)
            }
            Error::Aborted => return Self::Interrupted,
        };
        match help {
            Some(help) => mapped.with_help(help),
            None => mapped,
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Store { .. } | CliError::Other { .. } => EXIT_STORE,
        CliError::Interrupted => EXIT_SIGINT,
    }
}

/// Render error appropriately based on JSON flag
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        let error_envelope = ErrorEnvelope::new(serde_json::json!({
            "code": match err {
                CliError::Config { .. } => "config",
                CliError::Store { .. } => "store",
                CliError::Other { .. } => "other",
                CliError::Interrupted => "interrupted",
            },
            "message": err.to_string()
        }));

        match serde_json::to_string(&error_envelope) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else {
        // Use miette for human-friendly error display
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
        // Ensure output is flushed before potential process exit
        let _ = io::stderr().flush();
    }
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkEnvelope<T> {
    /// Status indicator - always "ok" for success
    pub status: &'static str,
    /// The actual data payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope<E> {
    /// Status indicator - always "error" for failures
    pub status: &'static str,
    /// The error details
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: E) -> Self {
        Self {
            status: "error",
            error,
        }
    }
}

/// How to reach AWS Secrets Manager.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum AwsModeArg {
    /// SDK when credentials are in the environment, `aws` CLI otherwise
    #[default]
    Auto,
    /// AWS SDK over HTTPS
    Sdk,
    /// The `aws` command-line tool
    Cli,
}

impl From<AwsModeArg> for AwsMode {
    fn from(mode: AwsModeArg) -> Self {
        match mode {
            AwsModeArg::Auto => Self::Auto,
            AwsModeArg::Sdk => Self::Sdk,
            AwsModeArg::Cli => Self::Cli,
        }
    }
}

/// Main CLI entry point for secmerge.
///
/// Merges local `key=value` overrides into AWS Secrets Manager secrets after
/// a manual review, and rolls secrets back to their previous version.
#[derive(Parser, Debug)]
#[command(name = "secmerge")]
#[command(
    about = "Merge local key=value overrides into AWS Secrets Manager secrets, with review and rollback"
)]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        env = "SECMERGE_LOG_LEVEL",
        value_enum
    )]
    pub level: crate::tracing::LogLevel,

    /// Diagnostic log format.
    #[arg(
        long,
        global = true,
        help = "Diagnostic log format on stderr",
        default_value = "compact",
        value_enum
    )]
    pub log_format: crate::tracing::TracingFormat,

    /// Emit JSON events and envelopes instead of terminal text.
    #[arg(long, global = true, help = "Emit JSON events and envelopes")]
    pub json: bool,

    /// Directory for override file names and the review file.
    #[arg(
        long,
        global = true,
        env = "SECMERGE_BASE_DIR",
        help = "Directory for override files and updated_secret.json (default: the executable's directory)"
    )]
    pub base_dir: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,

    /// Secrets Manager access mode.
    #[arg(
        long,
        global = true,
        env = "SECMERGE_AWS_MODE",
        help = "How to reach AWS Secrets Manager",
        default_value = "auto",
        value_enum
    )]
    pub aws_mode: AwsModeArg,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Merge an override file into a secret after review and confirmation.
    #[command(about = "Merge a local key=value file into a secret after review")]
    UpdateSecret {
        /// Region code; prompts when omitted.
        #[arg(long, env = "SECMERGE_REGION", help = "Region code (us, ca, uk)")]
        region: Option<Region>,
        /// Secret name or ARN; prompts when omitted.
        #[arg(long, help = "Secret name or ARN")]
        secret_id: Option<String>,
        /// Override file; prompts when omitted.
        #[arg(long, help = "File with key=value overrides")]
        file: Option<PathBuf>,
    },
    /// Restage the previous version of a secret as current.
    #[command(about = "Restore the previous version of a secret")]
    RollbackSecret {
        /// Region code; prompts when omitted.
        #[arg(long, env = "SECMERGE_REGION", help = "Region code (us, ca, uk)")]
        region: Option<Region>,
        /// Secret name or ARN; prompts when omitted.
        #[arg(long, help = "Secret name or ARN")]
        secret_id: Option<String>,
    },
    /// List secret names in a region.
    #[command(about = "List secret names in a region")]
    ListSecrets {
        /// Region code.
        #[arg(long, env = "SECMERGE_REGION", help = "Region code (us, ca, uk)")]
        region: Region,
    },
}

impl Commands {
    /// Subcommand name as typed on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UpdateSecret { .. } => "update-secret",
            Self::RollbackSecret { .. } => "rollback-secret",
            Self::ListSecrets { .. } => "list-secrets",
        }
    }
}

/// Parse command line arguments into a CLI structure.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracing::LogLevel;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::try_parse_from(["secmerge", "update-secret"]).unwrap();

        assert!(matches!(cli.level, LogLevel::Warn)); // Default log level
        assert!(!cli.json);
        assert!(!cli.no_color);
        assert_eq!(cli.aws_mode, AwsModeArg::Auto);
        assert!(matches!(
            cli.command,
            Commands::UpdateSecret {
                region: None,
                secret_id: None,
                file: None
            }
        ));
    }

    #[test]
    fn test_update_secret_flags() {
        let cli = Cli::try_parse_from([
            "secmerge",
            "update-secret",
            "--region",
            "uk",
            "--secret-id",
            "payments/api",
            "--file",
            "prod.env",
        ])
        .unwrap();

        let Commands::UpdateSecret {
            region,
            secret_id,
            file,
        } = cli.command
        else {
            panic!("Expected Commands::UpdateSecret");
        };
        assert_eq!(region, Some(Region::Uk));
        assert_eq!(secret_id.as_deref(), Some("payments/api"));
        assert_eq!(file, Some(PathBuf::from("prod.env")));
    }

    #[test]
    fn test_unknown_region_is_rejected() {
        let err = Cli::try_parse_from(["secmerge", "rollback-secret", "--region", "eu"])
            .unwrap_err();
        assert!(err.to_string().contains("Unknown region code 'eu'"));
    }

    #[test]
    fn test_rollback_has_no_file_flag() {
        assert!(Cli::try_parse_from(["secmerge", "rollback-secret", "--file", "x"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "secmerge",
            "list-secrets",
            "--region",
            "ca",
            "--json",
            "-L",
            "debug",
            "--aws-mode",
            "cli",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.level, LogLevel::Debug));
        assert_eq!(AwsMode::from(cli.aws_mode), AwsMode::Cli);
        assert_eq!(cli.command.name(), "list-secrets");
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(Cli::try_parse_from(["secmerge"]).is_err());
    }

    #[test]
    fn test_core_error_mapping() {
        let err = CliError::from(secmerge_core::Error::UnknownRegion {
            code: "eu".to_string(),
        });
        assert_eq!(exit_code_for(&err), EXIT_CLI);
        assert!(matches!(err, CliError::Config { help: Some(ref h), .. } if h.contains("us, ca, uk")));

        let err = CliError::from(secmerge_core::Error::store("put", "app", "AccessDenied"));
        assert_eq!(exit_code_for(&err), EXIT_STORE);

        let err = CliError::from(secmerge_core::Error::NoPreviousVersion {
            secret_id: "app".to_string(),
        });
        assert!(matches!(err, CliError::Store { .. }));

        let err = CliError::from(secmerge_core::Error::Aborted);
        assert_eq!(exit_code_for(&err), EXIT_SIGINT);
    }

    #[test]
    fn test_ok_envelope() {
        let envelope = OkEnvelope::new(vec!["a", "b"]);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok", "data": ["a", "b"]}));
    }

    #[test]
    fn test_error_envelope() {
        let envelope = ErrorEnvelope::new("boom");
        assert_eq!(envelope.status, "error");
        assert_eq!(envelope.error, "boom");
    }
}
