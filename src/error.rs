//! Error types for edlman.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read list {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write list {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
