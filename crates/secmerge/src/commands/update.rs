//! `secmerge update-secret`

use super::CommandContext;
use crate::cli::CliError;
use secmerge_core::{
    Prompter, Region, SelectionOptions, StoreConnector, UpdateOutcome, update_secret,
};
use serde::Serialize;
use std::path::PathBuf;

/// JSON payload describing how the update ended. Key names only.
#[derive(Debug, Serialize)]
pub struct UpdateReport {
    /// `"committed"` or `"cancelled"`
    pub status: &'static str,
    /// Secret name or ARN
    pub secret_id: String,
    /// Region code
    pub region: Region,
    /// New version id when committed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// Override keys absent remotely
    pub added: Vec<String>,
    /// Override keys with a new value
    pub changed: Vec<String>,
    /// Override keys with the same value
    pub unchanged: Vec<String>,
}

impl From<UpdateOutcome> for UpdateReport {
    fn from(outcome: UpdateOutcome) -> Self {
        let (status, selection, version_id, summary) = match outcome {
            UpdateOutcome::Cancelled { selection, summary } => {
                ("cancelled", selection, None, summary)
            }
            UpdateOutcome::Committed {
                selection,
                version_id,
                summary,
            } => ("committed", selection, Some(version_id), summary),
        };
        Self {
            status,
            secret_id: selection.secret_id,
            region: selection.region,
            version_id,
            added: summary.added,
            changed: summary.changed,
            unchanged: summary.unchanged,
        }
    }
}

/// Execute the update-secret command
///
/// # Errors
/// Returns the mapped workflow error. Declining the confirmation succeeds.
pub async fn execute_update_secret(
    ctx: &CommandContext,
    prompter: &mut dyn Prompter,
    connector: &dyn StoreConnector,
    region: Option<Region>,
    secret_id: Option<String>,
    file: Option<PathBuf>,
) -> Result<(), CliError> {
    let options = SelectionOptions {
        region,
        secret_id,
        override_file: file,
        base_dir: ctx.base_dir.clone(),
    };

    let outcome = update_secret(prompter, connector, &options).await?;
    ctx.print_envelope(UpdateReport::from(outcome))
}
