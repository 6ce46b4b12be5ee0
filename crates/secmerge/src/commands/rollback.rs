//! `secmerge rollback-secret`

use super::CommandContext;
use crate::cli::CliError;
use secmerge_core::{Prompter, Region, SelectionOptions, StoreConnector, rollback_secret};
use serde::Serialize;

/// JSON payload for a completed rollback.
#[derive(Debug, Serialize)]
pub struct RollbackReport {
    /// Secret name or ARN
    pub secret_id: String,
    /// Region code
    pub region: Region,
    /// Version now current
    pub version_id: String,
    /// Version that was current before
    pub replaced: String,
}

/// Execute the rollback-secret command
///
/// # Errors
/// Returns the mapped workflow error.
pub async fn execute_rollback_secret(
    ctx: &CommandContext,
    prompter: &mut dyn Prompter,
    connector: &dyn StoreConnector,
    region: Option<Region>,
    secret_id: Option<String>,
) -> Result<(), CliError> {
    let options = SelectionOptions {
        region,
        secret_id,
        override_file: None,
        base_dir: ctx.base_dir.clone(),
    };

    let outcome = rollback_secret(prompter, connector, &options).await?;
    ctx.print_envelope(RollbackReport {
        secret_id: outcome.selection.secret_id,
        region: outcome.selection.region,
        version_id: outcome.version_id,
        replaced: outcome.replaced,
    })
}
