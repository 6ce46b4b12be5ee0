//! Custom tracing Layer for capturing secmerge events.
//!
//! This layer intercepts tracing events whose target starts with `secmerge`
//! and that carry an `event_type` field, converts them to [`SecmergeEvent`]
//! instances, and hands them to an [`EventSink`]. Text fields are redacted
//! before the event is built.

use crate::event::{
    EventCategory, OutputEvent, RollbackEvent, SecmergeEvent, SelectionEvent, SessionEvent,
    UpdateEvent,
};
use crate::metadata::correlation_id;
use crate::redaction::redact;
use crate::sink::EventSink;
use std::sync::Arc;
use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Target prefix shared by all emit macros.
pub const TARGET_PREFIX: &str = "secmerge";

/// A tracing Layer that captures secmerge-specific events.
pub struct SecmergeEventLayer {
    sink: Arc<dyn EventSink>,
}

impl SecmergeEventLayer {
    /// Create a new layer that forwards events to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }
}

impl std::fmt::Debug for SecmergeEventLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecmergeEventLayer").finish_non_exhaustive()
    }
}

impl<S> Layer<S> for SecmergeEventLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let target = event.metadata().target();
        if !target.starts_with(TARGET_PREFIX) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        if let Some(category) = visitor.build() {
            self.sink
                .accept(&SecmergeEvent::new(correlation_id(), target, category));
        }
    }
}

/// Visitor for extracting typed fields from tracing events.
#[derive(Default)]
struct EventVisitor {
    event_type: Option<String>,
    command: Option<String>,
    code: Option<String>,
    aws_region: Option<String>,
    secret_id: Option<String>,
    file_name: Option<String>,
    path: Option<String>,
    added: Option<Vec<String>>,
    changed: Option<Vec<String>>,
    unchanged: Option<usize>,
    region: Option<String>,
    version_id: Option<String>,
    replaced: Option<String>,
    content: Option<String>,
}

/// Decode a JSON-encoded key list, redacting each name.
fn decode_keys(encoded: &str) -> Option<Vec<String>> {
    serde_json::from_str::<Vec<String>>(encoded)
        .ok()
        .map(|keys| keys.iter().map(|k| redact(k)).collect())
}

impl EventVisitor {
    fn build(self) -> Option<EventCategory> {
        let category = match self.event_type.as_deref()? {
            "session.started" => EventCategory::Session(SessionEvent::Started {
                command: self.command?,
            }),

            "selection.region" => EventCategory::Selection(SelectionEvent::RegionSelected {
                code: self.code?,
                aws_region: self.aws_region?,
            }),
            "selection.secret" => EventCategory::Selection(SelectionEvent::SecretSelected {
                secret_id: self.secret_id?,
            }),
            "selection.file_missing" => {
                EventCategory::Selection(SelectionEvent::OverrideFileMissing {
                    file_name: self.file_name?,
                })
            }
            "selection.file" => EventCategory::Selection(SelectionEvent::OverrideFileSelected {
                path: self.path?,
            }),

            "update.merge_summary" => EventCategory::Update(UpdateEvent::MergeSummarized {
                added: self.added?,
                changed: self.changed?,
                unchanged: self.unchanged.unwrap_or(0),
            }),
            "update.review_written" => {
                EventCategory::Update(UpdateEvent::ReviewWritten { path: self.path? })
            }
            "update.cancelled" => EventCategory::Update(UpdateEvent::Cancelled {
                secret_id: self.secret_id?,
            }),
            "update.committed" => EventCategory::Update(UpdateEvent::Committed {
                secret_id: self.secret_id?,
                region: self.region?,
                version_id: self.version_id?,
            }),

            "rollback.completed" => EventCategory::Rollback(RollbackEvent::RolledBack {
                secret_id: self.secret_id?,
                version_id: self.version_id?,
                replaced: self.replaced?,
            }),

            "output.stdout" => EventCategory::Output(OutputEvent::Stdout {
                content: self.content?,
            }),

            _ => return None,
        };
        Some(category)
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        let slot = match field.name() {
            "event_type" => {
                self.event_type = Some(value.to_string());
                return;
            }
            "added" => {
                self.added = decode_keys(value);
                return;
            }
            "changed" => {
                self.changed = decode_keys(value);
                return;
            }
            "command" => &mut self.command,
            "code" => &mut self.code,
            "aws_region" => &mut self.aws_region,
            "secret_id" => &mut self.secret_id,
            "file_name" => &mut self.file_name,
            "path" => &mut self.path,
            "region" => &mut self.region,
            "version_id" => &mut self.version_id,
            "replaced" => &mut self.replaced,
            "content" => &mut self.content,
            _ => return,
        };
        *slot = Some(redact(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == "unchanged" {
            self.unchanged = usize::try_from(value).ok();
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == "unchanged" {
            self.unchanged = usize::try_from(value).ok();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // `%value` fields arrive here; their Debug output is the Display text
        self.record_str(field, &format!("{value:?}"));
    }
}
