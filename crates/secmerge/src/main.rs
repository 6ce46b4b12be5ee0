//! secmerge CLI Application
//!
//! Interactive merge of local `key=value` overrides into AWS Secrets Manager
//! secrets with a review step, plus rollback to the previous version.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use secmerge::cli::{self, CliError, EXIT_OK, EXIT_SIGINT, exit_code_for, render_error};
use secmerge::commands::{self, CommandContext, default_base_dir};
use secmerge::tracing::{TracingConfig, init_tracing};

/// Credential variables whose values must never reach rendered output.
const CREDENTIAL_VARS: [&str; 2] = ["AWS_SECRET_ACCESS_KEY", "AWS_SESSION_TOKEN"];

/// Main entry point
fn main() {
    // Set up error handling first
    // NOTE: Using eprintln! in panic hook is intentional - tracing infrastructure
    // may be corrupted during a panic, so we use the most reliable output method.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    register_credentials(|var| std::env::var(var).ok());

    let cli = cli::parse();
    let exit_code = run_with_tokio(cli);
    std::process::exit(exit_code);
}

/// Register the values of set credential variables for redaction
fn register_credentials(lookup: impl Fn(&str) -> Option<String>) {
    for value in CREDENTIAL_VARS.into_iter().filter_map(lookup) {
        secmerge_events::register_secret(value);
    }
}

/// Create tokio runtime and run the selected command
fn run_with_tokio(cli: cli::Cli) -> i32 {
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            // NOTE: Using eprintln! here is intentional - tracing/event system
            // is not yet initialized at this point in startup.
            eprintln!("Fatal error: Failed to create tokio runtime: {e}");
            return 1;
        }
    };

    rt.block_on(run(cli))
}

/// Restore the cursor that prompt widgets may have hidden
fn cleanup_terminal() {
    let _ = crossterm::execute!(std::io::stderr(), crossterm::cursor::Show);
}

async fn run(cli: cli::Cli) -> i32 {
    let _ = ctrlc::set_handler(|| {
        cleanup_terminal();
        std::process::exit(EXIT_SIGINT);
    });

    let tracing_config = TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        json_events: cli.json,
        colors: !cli.no_color,
        ..Default::default()
    };
    // Ignore error if tracing already initialized (e.g., in tests)
    let _ = init_tracing(&tracing_config);

    let base_dir = match cli.base_dir.clone().map_or_else(default_base_dir, Ok) {
        Ok(dir) => dir,
        Err(err) => return fail(&err, cli.json),
    };
    if !base_dir.is_dir() {
        return fail(
            &CliError::config_with_help(
                format!("Base directory does not exist: {}", base_dir.display()),
                "Pass an existing directory with --base-dir or SECMERGE_BASE_DIR",
            ),
            cli.json,
        );
    }

    let ctx = CommandContext {
        base_dir,
        aws_mode: cli.aws_mode.into(),
        json: cli.json,
        colors: !cli.no_color,
    };
    tracing::debug!(command = cli.command.name(), base_dir = %ctx.base_dir.display(), "Dispatching command");

    match commands::execute(cli.command, &ctx).await {
        Ok(()) => EXIT_OK,
        Err(err) => fail(&err, ctx.json),
    }
}

fn fail(err: &CliError, json: bool) -> i32 {
    if matches!(err, CliError::Interrupted) {
        cleanup_terminal();
    }
    render_error(err, json);
    exit_code_for(err)
}
