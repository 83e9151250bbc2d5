//! # edlman - External Dynamic List maintenance
//!
//! Keeps firewall-consumed EDL files tidy. Each list holds one record per
//! line, `<address>#<comment>#<date>`. On every run edlman drops records older
//! than the retention window, drops records whose address is not a valid IP
//! or subnet, logs every removal, and (when configured to) rewrites the list
//! with what is left.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         edlman                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: run, check, init, version                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_json / serde_yaml)                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Pipeline (per list)                                        │
//! │    ├── Entry parser      (chrono date parsing)              │
//! │    ├── Expiry classifier                                    │
//! │    ├── Address validator (ipnet)                            │
//! │    └── Write decision                                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Audit (AuditSink trait → tracing)                          │
//! │  Writer (atomic rewrite through FileSystem trait)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use chrono::Local;
//! use edlman::audit::TracingAudit;
//! use edlman::config::Config;
//! use edlman::fs_abstraction::real_fs;
//! use edlman::pipeline::{run_lists, PipelineSettings};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.json")?;
//!     let settings = PipelineSettings::from_config(&config);
//!     let today = Local::now().date_naive();
//!
//!     for outcome in run_lists(real_fs(), &TracingAudit, &settings, today, &config.edl_list_names) {
//!         println!("{}", outcome.name());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`audit`] - Audit events and sinks
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`entry`] - Record parsing and permissive date handling
//! - [`error`] - Error types
//! - [`expiry`] - Retention window classification
//! - [`fs_abstraction`] - Filesystem trait for testability
//! - [`pipeline`] - Per-list decision engine
//! - [`validation`] - IP address and subnet validation
//! - [`writer`] - Output formatting and persistence

pub mod audit;
pub mod cli;
pub mod commands;
pub mod config;
pub mod entry;
pub mod error;
pub mod expiry;
pub mod fs_abstraction;
pub mod pipeline;
pub mod validation;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use entry::Entry;
pub use error::EdlError;
