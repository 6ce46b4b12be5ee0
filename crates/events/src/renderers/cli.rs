//! CLI renderer for secmerge events.
//!
//! Renders events as colored status lines for the terminal.
//! This module is allowed to use println!/eprintln! as it's the output layer.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use crate::event::{
    EventCategory, OutputEvent, RollbackEvent, SecmergeEvent, SelectionEvent, SessionEvent,
    UpdateEvent,
};
use crate::sink::EventSink;
use crossterm::style::{Color, Stylize};
use std::io::{self, IsTerminal, Write};

/// CLI renderer configuration.
#[derive(Debug, Clone)]
pub struct CliRendererConfig {
    /// Whether to use ANSI colors.
    pub colors: bool,
    /// Whether to show verbose output.
    pub verbose: bool,
}

impl Default for CliRendererConfig {
    fn default() -> Self {
        Self {
            colors: io::stdout().is_terminal(),
            verbose: false,
        }
    }
}

/// Output stream for a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

/// CLI renderer that outputs events to stdout/stderr.
#[derive(Debug, Default)]
pub struct CliRenderer {
    config: CliRendererConfig,
}

impl CliRenderer {
    /// Create a new CLI renderer with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new CLI renderer with the given configuration.
    #[must_use]
    pub const fn with_config(config: CliRendererConfig) -> Self {
        Self { config }
    }

    /// Render a single event.
    pub fn render(&self, event: &SecmergeEvent) {
        for (stream, line) in self.lines(event) {
            match stream {
                Stream::Stdout => {
                    println!("{line}");
                    let _ = io::stdout().flush();
                }
                Stream::Stderr => {
                    eprintln!("{line}");
                    let _ = io::stderr().flush();
                }
            }
        }
    }

    /// Format an event into the lines it renders to.
    #[must_use]
    pub fn lines(&self, event: &SecmergeEvent) -> Vec<(Stream, String)> {
        match &event.category {
            EventCategory::Session(e) => self.session_lines(e),
            EventCategory::Selection(e) => self.selection_lines(e),
            EventCategory::Update(e) => self.update_lines(e),
            EventCategory::Rollback(e) => self.rollback_lines(e),
            EventCategory::Output(OutputEvent::Stdout { content }) => {
                vec![(Stream::Stdout, content.clone())]
            }
        }
    }

    fn session_lines(&self, event: &SessionEvent) -> Vec<(Stream, String)> {
        match event {
            SessionEvent::Started { command } => {
                let title = match command.as_str() {
                    "rollback-secret" => "=== AWS Secrets Manager Rollback ===",
                    _ => "=== AWS Secrets Manager Updater ===",
                };
                vec![(
                    Stream::Stdout,
                    format!("\n{}\n", self.paint(title, Color::Cyan, true)),
                )]
            }
        }
    }

    fn selection_lines(&self, event: &SelectionEvent) -> Vec<(Stream, String)> {
        match event {
            SelectionEvent::RegionSelected { code, aws_region } => {
                let text = if self.config.verbose {
                    format!("✓ Selected Region: {code} ({aws_region})")
                } else {
                    format!("✓ Selected Region: {code}")
                };
                vec![(Stream::Stdout, self.paint(&text, Color::Green, false))]
            }
            SelectionEvent::SecretSelected { secret_id } => vec![(
                Stream::Stdout,
                format!(
                    "{}\n",
                    self.paint(&format!("✓ Secret ID: {secret_id}"), Color::Green, false)
                ),
            )],
            SelectionEvent::OverrideFileMissing { file_name } => vec![(
                Stream::Stderr,
                self.paint(&format!("✗ File '{file_name}' not found"), Color::Red, false),
            )],
            SelectionEvent::OverrideFileSelected { path } => {
                if self.config.verbose {
                    vec![(Stream::Stdout, format!("Using override file: {path}"))]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn update_lines(&self, event: &UpdateEvent) -> Vec<(Stream, String)> {
        match event {
            UpdateEvent::MergeSummarized {
                added,
                changed,
                unchanged,
            } => {
                let mut lines = Vec::with_capacity(added.len() + changed.len() + 1);
                lines.extend(
                    added
                        .iter()
                        .map(|k| (Stream::Stdout, self.paint(&format!("  + {k}"), Color::Green, false))),
                );
                lines.extend(
                    changed
                        .iter()
                        .map(|k| (Stream::Stdout, self.paint(&format!("  ~ {k}"), Color::Yellow, false))),
                );
                lines.push((
                    Stream::Stdout,
                    format!(
                        "{} added, {} changed, {unchanged} unchanged",
                        added.len(),
                        changed.len()
                    ),
                ));
                lines
            }
            UpdateEvent::ReviewWritten { path } => vec![
                (
                    Stream::Stdout,
                    self.paint(
                        &format!("\n Updated secret written to: {path}"),
                        Color::Cyan,
                        false,
                    ),
                ),
                (
                    Stream::Stdout,
                    format!(
                        "{}\n",
                        self.paint("   Review the file before confirming.", Color::Cyan, false)
                    ),
                ),
            ],
            UpdateEvent::Cancelled { .. } => {
                vec![(Stream::Stdout, self.paint("Update cancelled", Color::Red, false))]
            }
            UpdateEvent::Committed {
                secret_id,
                region,
                version_id,
            } => {
                let mut lines = vec![(
                    Stream::Stdout,
                    self.paint(
                        &format!("✓ Updated secret '{secret_id}' in region '{region}'"),
                        Color::Green,
                        false,
                    ),
                )];
                if self.config.verbose {
                    lines.push((Stream::Stdout, format!("  new version: {version_id}")));
                }
                lines
            }
        }
    }

    fn rollback_lines(&self, event: &RollbackEvent) -> Vec<(Stream, String)> {
        match event {
            RollbackEvent::RolledBack {
                version_id,
                replaced,
                ..
            } => {
                let mut lines = vec![(
                    Stream::Stdout,
                    self.paint(
                        &format!("✓ Rolled back to version {version_id}"),
                        Color::Green,
                        false,
                    ),
                )];
                if self.config.verbose {
                    lines.push((Stream::Stdout, format!("  replaced version: {replaced}")));
                }
                lines
            }
        }
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if !self.config.colors {
            return text.to_string();
        }
        let styled = text.with(color);
        if bold {
            styled.bold().to_string()
        } else {
            styled.to_string()
        }
    }
}

impl EventSink for CliRenderer {
    fn accept(&self, event: &SecmergeEvent) {
        self.render(event);
    }
}
