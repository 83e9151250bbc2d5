//! edlman - External Dynamic List manager
//!
//! Expires, validates and rewrites firewall IP lists.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use edlman::cli::{Cli, Commands};
use edlman::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or_default() {
        Commands::Run { dry_run, today } => {
            // Settings problems abort before any list is touched
            let config = Config::load(&cli.config)
                .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
            init_logging(cli.verbose, cli.quiet, config.log_file.as_deref())?;
            edlman::commands::run::run(&config, dry_run, today)
        }
        Commands::Check { address } => {
            init_logging(cli.verbose, cli.quiet, None)?;
            edlman::commands::check::run(&address)
        }
        Commands::Init { force } => {
            init_logging(cli.verbose, cli.quiet, None)?;
            edlman::commands::init::run(&cli.config, force)
        }
        Commands::Version => {
            println!("edlman {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Console logging on stderr, plus an append-only audit file when configured.
fn init_logging(verbose: bool, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let console_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(console_level));

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let audit_file = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {:?}", path))?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::INFO),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(audit_file)
        .try_init()?;

    Ok(())
}
