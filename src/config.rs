//! YAML Configuration File Support for Chromalign
//!
//! All stage configurations (scoring, alignment, fpcalc) plus logging can be
//! defined in a single YAML file and loaded at runtime. Every section is
//! optional and falls back to its defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1"
//!
//! scoring:
//!   match_below: 16
//!   mismatch_above: 32
//!   cache_capacity: 2048
//!
//! alignment:
//!   gap_open: -2
//!   gap_extend: 0
//!   use_parallel: false
//!
//! fpcalc:
//!   binary: "fpcalc"
//!   length_secs: 120
//!
//! logging:
//!   level: "info"
//!   json: false
//! ```

use std::fs;
use std::path::Path;

use ingest::FpcalcConfig;
use matcher::{AlignConfig, Matcher};
use perceptual::ScoringConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration for a comparison run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChromalignConfig {
    /// Configuration format version
    pub version: String,

    /// Frame scoring thresholds and decomposition memo size
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Gap model for global alignment
    #[serde(default)]
    pub alignment: AlignConfig,

    /// Fingerprint tool invocation
    #[serde(default)]
    pub fpcalc: FpcalcConfig,

    /// Log output for the binary
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ChromalignConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: ChromalignConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.scoring
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("scoring: {e}")))?;
        self.alignment
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("alignment: {e}")))?;
        self.fpcalc
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("fpcalc: {e}")))?;
        self.logging.validate()?;

        Ok(())
    }

    /// Build a [`Matcher`] from the scoring and alignment sections.
    pub fn matcher(&self) -> Result<Matcher, ConfigLoadError> {
        Matcher::new(&self.scoring, self.alignment.clone())
            .map_err(|e| ConfigLoadError::Validation(e.to_string()))
    }
}

impl Default for ChromalignConfig {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            scoring: ScoringConfig::default(),
            alignment: AlignConfig::default(),
            fpcalc: FpcalcConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration for the binary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(()),
            other => Err(ConfigLoadError::Validation(format!(
                "logging: unknown level '{other}'"
            ))),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
