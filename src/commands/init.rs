//! Init command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::fs_abstraction::{real_fs, FileSystem};

/// Write the bundled starter configuration to `config_path`
pub fn run(config_path: &Path, force: bool) -> Result<()> {
    if real_fs().exists(config_path) && !force {
        anyhow::bail!(
            "Config file {:?} already exists (use --force to overwrite)",
            config_path
        );
    }

    let config: Config = serde_json::from_str(Config::default_template())
        .context("Bundled config template is malformed")?;
    config.save(config_path)?;

    info!("Wrote default configuration to {:?}", config_path);
    println!("[OK] Configuration written to {}", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_loadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        run(&path, false).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.expires, 30);
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "keep me").unwrap();

        let err = run(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn test_init_force_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "old").unwrap();

        run(&path, true).unwrap();

        assert!(Config::load(&path).is_ok());
    }
}
