//! Configuration management for edlman.
//!
//! Settings are loaded once, validated, and handed to the pipeline as a plain
//! value. JSON is the native format; `.yaml`/`.yml` files are read with
//! serde_yaml.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::EdlError;
use crate::writer::OutputTarget;

/// Default audit log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "ip-addr-mgr.log";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Prefix prepended to a list name to form its output path
    pub source: String,

    /// List files to process, in order
    pub edl_list_names: Vec<String>,

    /// Retention window in days
    pub expires: u32,

    /// Write back to the original name instead of `<name>-X.txt`
    pub overwrite_original: bool,

    /// Master switch for writing; when off, lists are only audited
    pub always_overwrite: bool,

    /// Audit log file; `null` disables file logging
    #[serde(default = "default_log_file")]
    pub log_file: Option<PathBuf>,
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_LOG_FILE))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: String::new(),
            edl_list_names: Vec::new(),
            expires: 30,
            overwrite_original: true,
            always_overwrite: true,
            log_file: default_log_file(),
        }
    }
}

/// What the pipeline does with a list once it is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Never write; audit only.
    Skip,
    /// Write the active set to the given target.
    Write(OutputTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Format::Yaml
            }
            _ => Format::Json,
        }
    }
}

impl Config {
    /// Load configuration from a JSON or YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::parse(&content, Format::from_path(path))
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.validate()?;

        Ok(config)
    }

    fn parse(content: &str, format: Format) -> Result<Self> {
        Ok(match format {
            Format::Json => serde_json::from_str(content)?,
            Format::Yaml => serde_yaml::from_str(content)?,
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for name in &self.edl_list_names {
            if name.trim().is_empty() {
                return Err(EdlError::Config("edl_list_names contains an empty name".to_string()).into());
            }
            if !seen.insert(name.as_str()) {
                return Err(EdlError::Config(format!(
                    "edl_list_names contains '{}' more than once",
                    name
                ))
                .into());
            }
        }

        if let Some(ref log_file) = self.log_file {
            if log_file.as_os_str().is_empty() {
                return Err(EdlError::Config(
                    "log_file must not be empty (use null to disable)".to_string(),
                )
                .into());
            }
        }

        Ok(())
    }

    /// Save configuration atomically, in the format implied by the extension
    ///
    /// Uses tempfile + rename pattern to prevent corruption on crash.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let path = path.as_ref();
        let content = match Format::from_path(path) {
            Format::Json => serde_json::to_string_pretty(self)? + "\n",
            Format::Yaml => serde_yaml::to_string(self)?,
        };

        let parent_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut temp_file = NamedTempFile::new_in(parent_dir)
            .context("Failed to create temporary file for config")?;

        temp_file.write_all(content.as_bytes())?;
        temp_file.as_file().sync_all()?;

        temp_file
            .persist(path)
            .with_context(|| format!("Failed to persist config file: {:?}", path))?;

        Ok(())
    }

    /// Resolve the two write switches into a single policy
    pub fn write_policy(&self) -> WritePolicy {
        match (self.always_overwrite, self.overwrite_original) {
            (false, _) => WritePolicy::Skip,
            (true, true) => WritePolicy::Write(OutputTarget::Original),
            (true, false) => WritePolicy::Write(OutputTarget::Derived),
        }
    }

    /// Bundled starting configuration
    pub fn default_template() -> &'static str {
        include_str!("../templates/config.json")
    }
}
