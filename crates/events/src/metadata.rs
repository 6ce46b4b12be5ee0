//! Correlation ID tracking for secmerge events.

use std::sync::OnceLock;
use uuid::Uuid;

static CORRELATION_ID: OnceLock<Uuid> = OnceLock::new();

/// Get or create the correlation ID for this process.
///
/// Every event emitted during one CLI invocation carries the same ID.
#[must_use]
pub fn correlation_id() -> Uuid {
    *CORRELATION_ID.get_or_init(Uuid::new_v4)
}
