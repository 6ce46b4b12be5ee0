// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

//! secmerge - merge local overrides into AWS Secrets Manager secrets
//!
//! The binary is a thin shell over this library: [`cli`] parses arguments
//! and maps errors to exit codes, [`tracing`] installs logging plus the event
//! renderers, [`prompt`] supplies terminal widgets, and [`commands`] wires
//! them to the workflows in `secmerge-core`.

// CLI output goes to stdout/stderr on purpose
#![allow(clippy::print_stdout, clippy::print_stderr)]

/// CLI argument parsing and exit codes.
pub mod cli;
/// Subcommand implementations.
pub mod commands;
/// Terminal prompts.
pub mod prompt;
/// Tracing and logging configuration.
pub mod tracing;

pub use secmerge_core::Result;
