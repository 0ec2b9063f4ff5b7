//! Configuration loading and typed config structures for the habitat
//! runtime.
//!
//! The canonical configuration lives in `chroma-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure and a loader that reads the file. Every field has
//! a default, so a missing or partial file still yields a runnable
//! configuration.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level runtime configuration.
///
/// Mirrors the structure of `chroma-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    /// Habitat timing settings.
    #[serde(default)]
    pub habitat: HabitatConfig,

    /// Run bounds and seeding.
    #[serde(default)]
    pub run: RunConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RuntimeConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Habitat timing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HabitatConfig {
    /// Number of ticks in one in-game day.
    #[serde(default = "default_ticks_per_day")]
    pub ticks_per_day: u64,

    /// Trailing percentage of each day that counts as night.
    #[serde(default = "default_night_fraction_pct")]
    pub night_fraction_pct: u64,
}

impl Default for HabitatConfig {
    fn default() -> Self {
        Self {
            ticks_per_day: default_ticks_per_day(),
            night_fraction_pct: default_night_fraction_pct(),
        }
    }
}

/// Run bounds configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Maximum ticks to execute before the run stops.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            seed: default_seed(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_ticks_per_day() -> u64 {
    240
}

fn default_night_fraction_pct() -> u64 {
    30
}

fn default_max_ticks() -> u64 {
    1000
}

fn default_seed() -> u64 {
    7
}

fn default_log_level() -> String {
    String::from("info")
}
