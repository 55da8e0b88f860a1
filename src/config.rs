//! Configuration management for revar
//!
//! revar reads optional defaults from ~/.revar/config.toml. The file is never
//! created or written by revar; command-line flags always win over it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// revar configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Color mode: "auto", "always" or "never"
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: default_color() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable debug logging without passing --debug
    #[serde(default)]
    pub debug: bool,

    /// Append debug logs to this file instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_color() -> String {
    "auto".to_string()
}

/// Get the configuration file path
pub fn config_file_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home_dir.join(".revar").join("config.toml"))
}

/// Parse and validate configuration text
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config = toml::from_str(text).context("Failed to parse config")?;
    validate_config(&config)?;
    Ok(config)
}

/// Load configuration from `path`
///
/// A missing file yields the defaults. A malformed or invalid file is
/// reported on stderr and the defaults are used instead.
pub fn load_config_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }

    let loaded = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))
        .and_then(|text| parse_config(&text));

    match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: ignoring config file {}: {:#}", path.display(), e);
            Config::default()
        }
    }
}

/// Load configuration from the default location
pub fn load_config() -> Config {
    match config_file_path() {
        Ok(path) => load_config_from(&path),
        Err(_) => Config::default(),
    }
}

/// Validate configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    if !["auto", "always", "never"].contains(&config.display.color.as_str()) {
        anyhow::bail!(
            "Invalid color: {} (must be 'auto', 'always', or 'never')",
            config.display.color
        );
    }

    Ok(())
}
