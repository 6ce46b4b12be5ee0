//! `secmerge list-secrets`

use super::CommandContext;
use crate::cli::CliError;
use secmerge_core::{Region, StoreConnector};
use secmerge_events::emit_stdout;

/// Execute the list-secrets command
///
/// Names are printed one per line, or as a JSON envelope with `--json`.
///
/// # Errors
/// Returns the mapped store error.
pub async fn execute_list_secrets(
    ctx: &CommandContext,
    connector: &dyn StoreConnector,
    region: Region,
) -> Result<(), CliError> {
    let store = connector.connect(region).await?;
    let mut names = store.list_secret_names().await?;
    names.sort();

    if ctx.json {
        return ctx.print_envelope(names);
    }
    for name in &names {
        emit_stdout!(name);
    }
    Ok(())
}
