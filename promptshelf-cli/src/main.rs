use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use is_terminal::IsTerminal;
use promptshelf_common::{init_logging, ErrorSeverity, LogLevel, Severity};
use promptshelf_config::{ConfigProvider, ShelfConfig};
use promptshelf_library::LibraryError;
use std::process;

mod cli;
mod commands;
mod context;
mod display;
mod exit_codes;
mod injectors;
mod prompter;

use cli::Cli;
use context::CliContext;
use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_WARNING};

/// Load configuration, falling back to defaults when it is unusable
fn load_cli_configuration() -> ShelfConfig {
    match ConfigProvider::new().load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Configuration loading failed: {}", e);
            eprintln!("Continuing with default configuration...");
            ShelfConfig::default()
        }
    }
}

fn log_level(cli: &Cli, config: &ShelfConfig) -> LogLevel {
    if cli.debug {
        LogLevel::Trace
    } else if cli.verbose {
        LogLevel::Verbose
    } else if cli.quiet {
        LogLevel::Quiet
    } else {
        config.log_level().unwrap_or(LogLevel::Normal)
    }
}

/// Exit code for a failed command, based on the library error inside it
fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<LibraryError>() {
        Some(err) if err.severity() == ErrorSeverity::Warning => EXIT_WARNING,
        _ => EXIT_ERROR,
    }
}

async fn run(cli: Cli, config: ShelfConfig) -> Result<()> {
    let interactive = std::io::stdin().is_terminal();
    let mut ctx = CliContext::open(config, cli.data_dir, interactive).await?;
    commands::run(cli.command, &mut ctx).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_cli_configuration();

    if let Err(e) = init_logging(log_level(&cli, &config)) {
        eprintln!("Warning: {e}");
    }
    tracing::debug!("Using data directory {}", config.data_dir.display());

    let code = match run(cli, config).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            exit_code_for(&e)
        }
    };
    process::exit(code);
}
