//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use jackpatch_bus::BusAddress;
use jackpatch_core::{FailurePolicy, MATCH_ALL, MatchMode, SYSTEM_CLIENT_PATTERN};
use serde::{Deserialize, Serialize};
use tracing::info;

/// jackpatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
    /// Where to find the JACK patchbay
    #[serde(default)]
    pub bus: BusAddress,
    /// Default patterns for connect/disconnect
    #[serde(default)]
    pub defaults: PatternDefaults,
    /// Batch dispatch settings
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Pattern anchoring
    #[serde(default)]
    pub matching: MatchingConfig,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level used when neither `-v` nor `RUST_LOG` is given
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Patterns used when a connect/disconnect flag is omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDefaults {
    #[serde(default = "default_client_pattern")]
    pub source_client: String,
    #[serde(default = "default_port_pattern")]
    pub source_port: String,
    #[serde(default = "default_client_pattern")]
    pub dest_client: String,
    #[serde(default = "default_port_pattern")]
    pub dest_port: String,
}

impl Default for PatternDefaults {
    fn default() -> Self {
        Self {
            source_client: default_client_pattern(),
            source_port: default_port_pattern(),
            dest_client: default_client_pattern(),
            dest_port: default_port_pattern(),
        }
    }
}

fn default_client_pattern() -> String {
    SYSTEM_CLIENT_PATTERN.to_string()
}

fn default_port_pattern() -> String {
    MATCH_ALL.to_string()
}

/// Batch dispatch settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct DispatchConfig {
    /// `best-effort` or `fail-fast`
    #[serde(default)]
    pub policy: FailurePolicy,
}

/// Pattern anchoring settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct MatchingConfig {
    /// `start` or `full`
    #[serde(default)]
    pub mode: MatchMode,
}

/// Load configuration from the given file, or from the default location.
///
/// An explicitly given file must exist; a missing default file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match config_path() {
            Some(p) => (p, false),
            None => {
                info!("Could not determine config directory, using defaults");
                return Ok(Config::default());
            }
        },
    };

    if !explicit && !config_path.exists() {
        info!(?config_path, "Config file not found, using defaults");
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {config_path:?}"))?;
    parse_config(&content).with_context(|| format!("Failed to parse config file: {config_path:?}"))
}

/// Parse configuration from TOML.
pub fn parse_config(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Get the default configuration file path.
fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "jackpatch", "jackpatch").map(|dirs| dirs.config_dir().join("config.toml"))
}
