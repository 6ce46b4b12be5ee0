//! The update and rollback workflows.

use crate::error::{Error, Result};
use crate::merge::{MergeSummary, merge};
use crate::overrides::load_overrides;
use crate::prompt::Prompter;
use crate::review::write_review_file;
use crate::selection::{SecretSelection, SelectionOptions, select_secret};
use crate::store::{StoreConnector, VersionStage};
use secmerge_events::{
    emit_merge_summary, emit_review_written, emit_rolled_back, emit_secret_updated,
    emit_session_started, emit_update_cancelled, register_secrets,
};

/// Confirmation asked before any remote change.
pub const CONFIRM_PROMPT: &str = "Do you want to update AWS Secrets Manager with these values?";

/// How an update session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The operator declined; the remote secret was not touched.
    Cancelled {
        /// What was selected
        selection: SecretSelection,
        /// What the merge would have changed
        summary: MergeSummary,
    },
    /// The merged secret was stored.
    Committed {
        /// What was selected
        selection: SecretSelection,
        /// Version id assigned by the store
        version_id: String,
        /// What the merge changed
        summary: MergeSummary,
    },
}

/// Result of a rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackOutcome {
    /// What was selected
    pub selection: SecretSelection,
    /// Version now staged as current
    pub version_id: String,
    /// Version that was current before the rollback
    pub replaced: String,
}

/// Merge a local override file into a remote secret after operator review.
///
/// The merged document is written to the review file in `options.base_dir`
/// and only pushed if the operator confirms (default no).
///
/// # Errors
/// Returns selection, store, decode and file errors. Declining is not an error.
pub async fn update_secret(
    prompter: &mut dyn Prompter,
    connector: &dyn StoreConnector,
    options: &SelectionOptions,
) -> Result<UpdateOutcome> {
    emit_session_started!("update-secret");

    let session = select_secret(prompter, connector, options, true).await?;
    let selection = session.selection;
    let store = session.store;

    // The file may have been removed since it was picked
    let override_file = selection
        .override_file
        .clone()
        .unwrap_or_else(|| options.base_dir.clone());
    if !override_file.is_file() {
        return Err(Error::MissingOverrideFile {
            path: override_file,
        });
    }

    let remote = store.get_secret_value(&selection.secret_id).await?;
    let overrides = load_overrides(&override_file)?;
    register_secrets(remote.value_texts());
    register_secrets(overrides.value_texts());

    let merged = merge(&remote, &overrides);
    let summary = MergeSummary::between(&remote, &overrides);
    tracing::debug!(
        secret_id = %selection.secret_id,
        remote_keys = remote.len(),
        override_keys = overrides.len(),
        merged_keys = merged.len(),
        "Merged overrides"
    );
    emit_merge_summary!(&summary.added, &summary.changed, summary.unchanged.len());

    let review_path = write_review_file(&options.base_dir, &merged)?;
    emit_review_written!(review_path.display());

    if !prompter.confirm(CONFIRM_PROMPT, false)? {
        emit_update_cancelled!(selection.secret_id);
        return Ok(UpdateOutcome::Cancelled { selection, summary });
    }

    let version_id = store
        .put_secret(&selection.secret_id, &merged.to_compact_json()?)
        .await?;
    emit_secret_updated!(selection.secret_id, selection.region.code(), version_id);

    Ok(UpdateOutcome::Committed {
        selection,
        version_id,
        summary,
    })
}

/// Restage the previous version of a secret as current.
///
/// # Errors
/// Returns [`Error::NoPreviousVersion`] when nothing is staged as previous,
/// plus selection and store errors.
pub async fn rollback_secret(
    prompter: &mut dyn Prompter,
    connector: &dyn StoreConnector,
    options: &SelectionOptions,
) -> Result<RollbackOutcome> {
    emit_session_started!("rollback-secret");

    let session = select_secret(prompter, connector, options, false).await?;
    let selection = session.selection;
    let store = session.store;

    let previous = store
        .get_secret(&selection.secret_id, VersionStage::Previous)
        .await?;
    let current = store
        .get_secret(&selection.secret_id, VersionStage::Current)
        .await?;

    store
        .move_stage(
            &selection.secret_id,
            VersionStage::Current,
            &previous.version_id,
            Some(&current.version_id),
        )
        .await?;
    emit_rolled_back!(
        selection.secret_id,
        previous.version_id,
        current.version_id
    );

    Ok(RollbackOutcome {
        selection,
        version_id: previous.version_id,
        replaced: current.version_id,
    })
}
