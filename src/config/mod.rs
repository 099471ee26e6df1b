//! Configuration loading and validation.

/// TOML parsing and value validation.
pub mod parser;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "DIRSNAP_CONFIG_PATH";

/// Configuration file path relative to the user configuration directory.
pub const DEFAULT_CONFIG_FILE: &str = "dirsnap/config.toml";

/// Top-level configuration file contents.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Directory scanning behaviour
    #[serde(default)]
    pub scan: ScanConfig,
}

/// The `[scan]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanConfig {
    /// Delay between rescans in the poll loop, in humantime syntax ("500ms", "2s")
    #[serde(default = "default_interval")]
    pub interval: String,
    /// Glob patterns for entry names to leave out of snapshots
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    /// Stat entries whose type the directory stream did not report
    #[serde(default = "default_resolve_unknown")]
    pub resolve_unknown: bool,
}

fn default_interval() -> String {
    "1s".to_string()
}

const fn default_resolve_unknown() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            ignore_patterns: Vec::new(),
            resolve_unknown: default_resolve_unknown(),
        }
    }
}

impl ScanConfig {
    /// Parsed rescan interval
    ///
    /// # Errors
    ///
    /// Returns an error if `interval` is not a valid duration.
    pub fn interval(&self) -> Result<Duration> {
        humantime::parse_duration(&self.interval)
            .with_context(|| format!("Invalid scan interval: {:?}", self.interval))
    }
}

impl Config {
    /// Resolve the configuration file location
    ///
    /// `DIRSNAP_CONFIG_PATH` wins over the platform configuration directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no configuration directory can be determined.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        let base = dirs::config_dir().context("Could not find configuration directory")?;
        Ok(base.join(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from a file
    ///
    /// A missing file is not an error; defaults are returned instead.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot read or parse the configuration file
    /// - Configuration file contains invalid TOML
    /// - A value fails validation
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        parser::parse_config_file(path)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot write to the file
    /// - TOML serialization fails
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_str = self.to_toml()?;
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create config file: {}", path.display()))?;
        file.write_all(toml_str.as_bytes())?;
        Ok(())
    }

    /// Render the configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if TOML serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
