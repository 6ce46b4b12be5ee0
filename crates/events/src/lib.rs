//! Structured event system for secmerge.
//!
//! Workflow code never prints. It emits events through the macros below,
//! which are ordinary `tracing` events with a `secmerge::*` target and an
//! `event_type` field. [`SecmergeEventLayer`] captures them, redacts any
//! registered secret values, and hands typed [`SecmergeEvent`]s to an
//! [`EventSink`] such as [`CliRenderer`] or [`JsonRenderer`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use secmerge_events::{CliRenderer, SecmergeEventLayer, emit_secret_selected};
//! use std::sync::Arc;
//! use tracing_subscriber::layer::SubscriberExt;
//! use tracing_subscriber::util::SubscriberInitExt;
//!
//! tracing_subscriber::registry()
//!     .with(SecmergeEventLayer::new(Arc::new(CliRenderer::new())))
//!     .init();
//!
//! emit_secret_selected!("payments/api");
//! ```

pub mod event;
pub mod layer;
pub mod metadata;
pub mod redaction;
pub mod renderers;
pub mod sink;

pub use event::{
    EventCategory, OutputEvent, RollbackEvent, SecmergeEvent, SelectionEvent, SessionEvent,
    UpdateEvent,
};
pub use layer::SecmergeEventLayer;
pub use metadata::correlation_id;
pub use redaction::{REDACTED_PLACEHOLDER, redact, register_secret, register_secrets};
pub use renderers::{CliRenderer, CliRendererConfig, JsonRenderer};
pub use sink::{CollectingSink, EventSink};

/// Encode key names as a JSON array for transport in a single tracing field.
#[doc(hidden)]
pub fn encode_keys<I, S>(keys: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let keys: Vec<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
    serde_json::to_string(&keys).unwrap_or_else(|_| "[]".to_string())
}

// ============================================================================
// Emit Macros
// ============================================================================

/// Emit a session started event.
///
/// # Example
/// ```rust,ignore
/// emit_session_started!("update-secret");
/// ```
#[macro_export]
macro_rules! emit_session_started {
    ($command:expr) => {
        ::tracing::info!(
            target: "secmerge::session",
            event_type = "session.started",
            command = %$command,
        )
    };
}

/// Emit a region selected event.
#[macro_export]
macro_rules! emit_region_selected {
    ($code:expr, $aws_region:expr) => {
        ::tracing::info!(
            target: "secmerge::selection",
            event_type = "selection.region",
            code = %$code,
            aws_region = %$aws_region,
        )
    };
}

/// Emit a secret selected event.
#[macro_export]
macro_rules! emit_secret_selected {
    ($secret_id:expr) => {
        ::tracing::info!(
            target: "secmerge::selection",
            event_type = "selection.secret",
            secret_id = %$secret_id,
        )
    };
}

/// Emit an override file missing event.
#[macro_export]
macro_rules! emit_override_file_missing {
    ($file_name:expr) => {
        ::tracing::info!(
            target: "secmerge::selection",
            event_type = "selection.file_missing",
            file_name = %$file_name,
        )
    };
}

/// Emit an override file selected event.
#[macro_export]
macro_rules! emit_override_file_selected {
    ($path:expr) => {
        ::tracing::info!(
            target: "secmerge::selection",
            event_type = "selection.file",
            path = %$path,
        )
    };
}

/// Emit a merge summary event. Only key names are carried, never values.
///
/// # Example
/// ```rust,ignore
/// emit_merge_summary!(&summary.added, &summary.changed, summary.unchanged.len());
/// ```
#[macro_export]
macro_rules! emit_merge_summary {
    ($added:expr, $changed:expr, $unchanged:expr) => {
        ::tracing::info!(
            target: "secmerge::update",
            event_type = "update.merge_summary",
            added = %$crate::encode_keys($added),
            changed = %$crate::encode_keys($changed),
            unchanged = $unchanged,
        )
    };
}

/// Emit a review file written event.
#[macro_export]
macro_rules! emit_review_written {
    ($path:expr) => {
        ::tracing::info!(
            target: "secmerge::update",
            event_type = "update.review_written",
            path = %$path,
        )
    };
}

/// Emit an update cancelled event.
#[macro_export]
macro_rules! emit_update_cancelled {
    ($secret_id:expr) => {
        ::tracing::info!(
            target: "secmerge::update",
            event_type = "update.cancelled",
            secret_id = %$secret_id,
        )
    };
}

/// Emit a secret updated event.
///
/// # Example
/// ```rust,ignore
/// emit_secret_updated!("payments/api", "us", "f1c2...");
/// ```
#[macro_export]
macro_rules! emit_secret_updated {
    ($secret_id:expr, $region:expr, $version_id:expr) => {
        ::tracing::info!(
            target: "secmerge::update",
            event_type = "update.committed",
            secret_id = %$secret_id,
            region = %$region,
            version_id = %$version_id,
        )
    };
}

/// Emit a rollback completed event.
#[macro_export]
macro_rules! emit_rolled_back {
    ($secret_id:expr, $version_id:expr, $replaced:expr) => {
        ::tracing::info!(
            target: "secmerge::rollback",
            event_type = "rollback.completed",
            secret_id = %$secret_id,
            version_id = %$version_id,
            replaced = %$replaced,
        )
    };
}

/// Emit a line for stdout.
#[macro_export]
macro_rules! emit_stdout {
    ($content:expr) => {
        ::tracing::info!(
            target: "secmerge::output",
            event_type = "output.stdout",
            content = %$content,
        )
    };
}
