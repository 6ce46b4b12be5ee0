//! Tracing configuration for the secmerge CLI
//!
//! Two layers share one registry: a `fmt` layer for diagnostics on stderr,
//! filtered by level or `RUST_LOG`, and the [`SecmergeEventLayer`] that turns
//! emitted events into operator-facing output.

use secmerge_events::{
    CliRenderer, CliRendererConfig, EventSink, JsonRenderer, SecmergeEventLayer, correlation_id,
};
use std::io::{self, IsTerminal};
use std::sync::Arc;
pub use tracing::Level;
use tracing_subscriber::filter::{EnvFilter, FilterExt, Targets, filter_fn};
use tracing_subscriber::{Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Tracing output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TracingFormat {
    /// Pretty-printed human-readable format
    Pretty,
    /// Compact single-line format
    Compact,
    /// Structured JSON format
    Json,
}

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Show all logs (trace level)
    Trace,
    /// Show debug and above
    Debug,
    /// Show info and above
    Info,
    /// Show warnings and above (default)
    Warn,
    /// Show errors only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Diagnostic log format on stderr
    pub format: TracingFormat,
    /// Diagnostic log level when no filter is given
    pub level: Level,
    /// Explicit filter directive, overriding `level` and `RUST_LOG`
    pub filter: Option<String>,
    /// Render events as JSON lines instead of terminal text
    pub json_events: bool,
    /// Allow ANSI colors in terminal output
    pub colors: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            format: TracingFormat::Compact,
            level: Level::WARN, // Default to quiet operation
            filter: None,
            json_events: false,
            colors: true,
        }
    }
}

impl TracingConfig {
    /// Sink receiving the operator-facing events.
    #[must_use]
    pub fn event_sink(&self) -> Arc<dyn EventSink> {
        if self.json_events {
            Arc::new(JsonRenderer::new())
        } else {
            Arc::new(CliRenderer::with_config(CliRendererConfig {
                colors: self.colors && io::stdout().is_terminal(),
                verbose: self.level >= Level::DEBUG,
            }))
        }
    }

    fn env_filter(&self) -> miette::Result<EnvFilter> {
        if let Some(filter) = &self.filter {
            EnvFilter::try_new(filter)
        } else {
            EnvFilter::try_from_default_env().or_else(|_| {
                let level_str = match self.level {
                    Level::TRACE => "trace",
                    Level::DEBUG => "debug",
                    Level::INFO => "info",
                    Level::WARN => "warn",
                    Level::ERROR => "error",
                };
                EnvFilter::try_new(format!(
                    "secmerge={level_str},secmerge_core={level_str},secmerge_aws={level_str},secmerge_events={level_str}"
                ))
            })
        }
        .map_err(|e| miette::miette!("Failed to create tracing filter: {e}"))
    }
}

/// Initialize tracing with the given configuration
///
/// # Errors
/// Fails if the filter directive is invalid or a global subscriber is
/// already installed.
pub fn init_tracing(config: &TracingConfig) -> miette::Result<()> {
    // Emitted events are rendered by the event layer, not logged twice
    let not_an_event =
        filter_fn(|meta: &tracing::Metadata<'_>| meta.fields().field("event_type").is_none());
    let log_filter = config.env_filter()?.and(not_an_event);

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        TracingFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(io::stderr)
            .with_ansi(config.colors)
            .with_target(true)
            .with_filter(log_filter)
            .boxed(),
        TracingFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(io::stderr)
            .with_ansi(config.colors)
            .with_target(false)
            .with_filter(log_filter)
            .boxed(),
        TracingFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_current_span(true)
            .with_filter(log_filter)
            .boxed(),
    };

    let event_layer = SecmergeEventLayer::new(config.event_sink())
        .with_filter(Targets::new().with_target("secmerge", Level::INFO));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(event_layer)
        .try_init()
        .map_err(|e| miette::miette!("Failed to initialize tracing: {e}"))?;

    tracing::debug!(
        correlation_id = %correlation_id(),
        version = env!("CARGO_PKG_VERSION"),
        format = ?config.format,
        "Tracing initialized for secmerge CLI"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_conversion() {
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }

    #[test]
    fn test_explicit_filter_wins() {
        let config = TracingConfig {
            filter: Some("secmerge_aws=trace".to_string()),
            ..Default::default()
        };
        assert!(config.env_filter().is_ok());

        let bad = TracingConfig {
            filter: Some("secmerge=notalevel".to_string()),
            ..Default::default()
        };
        assert!(bad.env_filter().is_err());
    }

    #[test]
    fn test_default_config_is_quiet() {
        let config = TracingConfig::default();
        assert_eq!(config.level, Level::WARN);
        assert!(!config.json_events);
    }
}
