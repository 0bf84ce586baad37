//! cfgsmith CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Configuration error
//! - 4: Template error

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cfgsmith_core::{CoreError, Settings};
use cfgsmith_templates::TemplateError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let working_dir = match &cli.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to determine the working directory")?,
    };

    // Settings decide the default log level, so notes wait until logging is up
    let mut notes = Vec::new();
    let settings = Settings::load(&working_dir, cli.command.project(), &mut notes)
        .context("Failed to load settings")?;

    init_logging(&cli, &settings.log_level);
    for note in &notes {
        debug!("{}", note);
    }
    debug!("Base directory: {:?}", settings.base_dir());

    match cli.command {
        Commands::Init(args) => commands::init::execute(args, settings).await,
        Commands::Render(args) => commands::render::execute(args, settings).await,
    }
}

/// Pick the log filter: `RUST_LOG` wins, then `-v`/`-q`, then `log_level` from settings.
fn log_filter(cli: &Cli, configured: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        configured
    };
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_logging(cli: &Cli, configured: &str) {
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(log_filter(cli, configured))
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(core) = cause.downcast_ref::<CoreError>() {
            return match core {
                CoreError::Config { .. } | CoreError::Yaml { .. } => ExitCodes::CONFIG_ERROR,
                CoreError::MissingInput(_) => ExitCodes::INVALID_ARGS,
                CoreError::Template(_) => ExitCodes::TEMPLATE_ERROR,
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
        if cause.downcast_ref::<TemplateError>().is_some() {
            return ExitCodes::TEMPLATE_ERROR;
        }
    }
    ExitCodes::GENERAL_ERROR
}
