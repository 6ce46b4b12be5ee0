//! Event sinks receive events captured by [`crate::SecmergeEventLayer`].
//!
//! Rendering is synchronous: an event is fully written before the emitting
//! call returns, so output never interleaves with an interactive prompt.

use crate::event::SecmergeEvent;
use std::sync::Mutex;

/// Destination for captured events.
pub trait EventSink: Send + Sync {
    /// Handle one event.
    fn accept(&self, event: &SecmergeEvent);
}

/// Sink that stores every event in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<SecmergeEvent>>,
}

impl CollectingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    #[must_use]
    pub fn events(&self) -> Vec<SecmergeEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for CollectingSink {
    fn accept(&self, event: &SecmergeEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
