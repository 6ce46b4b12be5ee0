//! Event renderers.

pub mod cli;
pub mod json;

pub use cli::{CliRenderer, CliRendererConfig, Stream};
pub use json::JsonRenderer;
