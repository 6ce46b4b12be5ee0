pub mod list;
pub mod rollback;
pub mod update;

use crate::cli::{CliError, Commands, OkEnvelope};
use crate::prompt::DialoguerPrompter;
use secmerge_aws::{AwsConnector, AwsMode};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Directory for override file names and the review file
    pub base_dir: PathBuf,
    /// Secrets Manager access mode
    pub aws_mode: AwsMode,
    /// Print JSON envelopes on success
    pub json: bool,
    /// Colored prompts
    pub colors: bool,
}

impl CommandContext {
    /// `--file` as given, made absolute against the working directory.
    ///
    /// # Errors
    /// Fails if the working directory cannot be determined.
    pub fn resolve_cli_path(path: &Path) -> Result<PathBuf, CliError> {
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        let cwd = std::env::current_dir()
            .map_err(|e| CliError::other(format!("Cannot determine working directory: {e}")))?;
        Ok(cwd.join(path))
    }

    /// Print `data` as an ok envelope when JSON output is on.
    pub(crate) fn print_envelope<T: Serialize>(&self, data: T) -> Result<(), CliError> {
        if self.json {
            let json = serde_json::to_string(&OkEnvelope::new(data))
                .map_err(|e| CliError::other(format!("Failed to serialize output: {e}")))?;
            println!("{json}");
        }
        Ok(())
    }
}

/// Default base directory: the directory holding the running executable.
///
/// # Errors
/// Fails if neither the executable path nor the working directory is known.
pub fn default_base_dir() -> Result<PathBuf, CliError> {
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        return Ok(dir.to_path_buf());
    }
    std::env::current_dir()
        .map_err(|e| CliError::other(format!("Cannot determine base directory: {e}")))
}

/// Run a parsed subcommand against AWS with terminal prompts.
///
/// # Errors
/// Returns the mapped workflow error.
pub async fn execute(command: Commands, ctx: &CommandContext) -> Result<(), CliError> {
    let connector = AwsConnector::new(ctx.aws_mode);
    let mut prompter = DialoguerPrompter::new(ctx.colors);

    match command {
        Commands::UpdateSecret {
            region,
            secret_id,
            file,
        } => {
            let file = file
                .as_deref()
                .map(CommandContext::resolve_cli_path)
                .transpose()?;
            update::execute_update_secret(ctx, &mut prompter, &connector, region, secret_id, file)
                .await
        }
        Commands::RollbackSecret { region, secret_id } => {
            rollback::execute_rollback_secret(ctx, &mut prompter, &connector, region, secret_id)
                .await
        }
        Commands::ListSecrets { region } => {
            list::execute_list_secrets(ctx, &connector, region).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_file_is_kept() {
        let path = std::env::temp_dir().join("over.env");
        assert_eq!(CommandContext::resolve_cli_path(&path).unwrap(), path);
    }

    #[test]
    fn test_relative_file_uses_working_directory() {
        let resolved = CommandContext::resolve_cli_path(Path::new("over.env")).unwrap();
        assert_eq!(
            resolved,
            std::env::current_dir().unwrap().join("over.env")
        );
    }

    #[test]
    fn test_default_base_dir_exists() {
        assert!(default_base_dir().unwrap().is_dir());
    }
}
