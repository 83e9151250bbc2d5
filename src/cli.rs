//! CLI argument parsing with clap.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::entry::parse_entry_date;
use crate::error::EdlError;

#[derive(Parser, Debug)]
#[command(name = "edlman")]
#[command(author, version, about = "External Dynamic List manager for firewall IP lists")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file path (JSON, or YAML by extension)
    #[arg(short, long, default_value = "config.json", global = true)]
    pub config: PathBuf,

    /// Quiet mode (errors only on the console)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Expire, validate and rewrite every configured list (default)
    Run {
        /// Classify and log, but never write any list
        #[arg(long)]
        dry_run: bool,

        /// Reference date instead of today (YYYY-MM-DD)
        #[arg(long, value_parser = parse_today)]
        today: Option<NaiveDate>,
    },

    /// Check whether an address or subnet would be kept
    Check {
        /// IP address or CIDR to check
        address: String,
    },

    /// Write a starter configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show version
    Version,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Run {
            dry_run: false,
            today: None,
        }
    }
}

fn parse_today(raw: &str) -> Result<NaiveDate, EdlError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_entry_date(raw))
        .ok_or_else(|| EdlError::InvalidDate(raw.to_string()))
}
