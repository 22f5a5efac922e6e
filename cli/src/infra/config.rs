//! YAML configuration loading with environment overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::config::{BdaptConfig, DEFAULT_CONFIG_PATH};

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "BDAPT_CONFIG";

/// Environment variable overriding `data_dir`.
pub const DATA_DIR_ENV: &str = "BDAPT_DATA_DIR";

/// Loads `BdaptConfig` from a YAML file on disk.
#[derive(Debug, Clone)]
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    /// Config at `$BDAPT_CONFIG`, or `/etc/bdapt/config.yaml`.
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
        Self { path }
    }

    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file (defaults when absent), then apply `BDAPT_DATA_DIR`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<BdaptConfig> {
        let mut config = self.load_file()?;
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        tracing::debug!(path = %self.path.display(), data_dir = %config.data_dir.display(), "configuration loaded");
        Ok(config)
    }

    fn load_file(&self) -> Result<BdaptConfig> {
        if !self.path.exists() {
            return Ok(BdaptConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BdaptConfig::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", self.path.display()))
    }
}
