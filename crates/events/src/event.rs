//! Event type definitions for structured secmerge events.
//!
//! Events are grouped by the workflow stage that produces them (session,
//! selection, update, rollback) plus a generic output category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A structured secmerge event with full metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecmergeEvent {
    /// Unique event identifier.
    pub id: Uuid,
    /// Correlation ID shared by every event of one invocation.
    pub correlation_id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The tracing target that produced the event.
    pub target: String,
    /// The event category and data.
    pub category: EventCategory,
}

impl SecmergeEvent {
    /// Create a new event with the given category.
    #[must_use]
    pub fn new(correlation_id: Uuid, target: impl Into<String>, category: EventCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            correlation_id,
            timestamp: Utc::now(),
            target: target.into(),
            category,
        }
    }
}

/// Event categories organized by workflow stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EventCategory {
    /// Session lifecycle.
    Session(SessionEvent),
    /// Region, secret and override file selection.
    Selection(SelectionEvent),
    /// Merge-and-confirm workflow.
    Update(UpdateEvent),
    /// Version rollback workflow.
    Rollback(RollbackEvent),
    /// Plain output lines.
    Output(OutputEvent),
}

/// Session lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum SessionEvent {
    /// An interactive command started.
    Started {
        /// Subcommand name (e.g. `update-secret`).
        command: String,
    },
}

/// Selection events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum SelectionEvent {
    /// A region was chosen.
    RegionSelected {
        /// Short region code.
        code: String,
        /// AWS region identifier.
        aws_region: String,
    },
    /// A secret was chosen.
    SecretSelected {
        /// Secret name or ARN.
        secret_id: String,
    },
    /// The operator entered a file name that does not exist.
    OverrideFileMissing {
        /// File name as entered.
        file_name: String,
    },
    /// An existing override file was chosen.
    OverrideFileSelected {
        /// Resolved path.
        path: String,
    },
}

/// Merge-and-confirm events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum UpdateEvent {
    /// Key-level summary of the merge.
    MergeSummarized {
        /// Keys only present in the override file.
        added: Vec<String>,
        /// Keys whose value the override file changes.
        changed: Vec<String>,
        /// Number of override keys that match the remote value.
        unchanged: usize,
    },
    /// The merged secret was written for review.
    ReviewWritten {
        /// Location of the review file.
        path: String,
    },
    /// The operator declined the update.
    Cancelled {
        /// Secret name or ARN.
        secret_id: String,
    },
    /// The merged secret was stored.
    Committed {
        /// Secret name or ARN.
        secret_id: String,
        /// Short region code.
        region: String,
        /// Version id created by the store.
        version_id: String,
    },
}

/// Rollback events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum RollbackEvent {
    /// The current stage now points at the previous version.
    RolledBack {
        /// Secret name or ARN.
        secret_id: String,
        /// Version id that is now current.
        version_id: String,
        /// Version id that was current before the rollback.
        replaced: String,
    },
}

/// Plain output events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum OutputEvent {
    /// A line for stdout.
    Stdout {
        /// Line content.
        content: String,
    },
}
