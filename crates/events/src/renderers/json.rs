//! JSON renderer for secmerge events.
//!
//! Renders events as JSON lines for machine consumption.
//! This module is allowed to use println! as it's the output layer.

#![allow(clippy::print_stdout)]

use crate::event::SecmergeEvent;
use crate::sink::EventSink;

/// JSON renderer that outputs events as JSON lines.
#[derive(Debug, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    /// Create a new JSON renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Serialize a single event on one line.
    ///
    /// # Errors
    /// Returns the serializer error if the event cannot be encoded.
    pub fn to_json(&self, event: &SecmergeEvent) -> serde_json::Result<String> {
        serde_json::to_string(event)
    }
}

impl EventSink for JsonRenderer {
    fn accept(&self, event: &SecmergeEvent) {
        if let Ok(json) = self.to_json(event) {
            println!("{json}");
        }
    }
}
