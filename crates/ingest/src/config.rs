//! Configuration for the `fpcalc` fingerprint provider.
//!
//! ```rust
//! use ingest::FpcalcConfig;
//!
//! let config = FpcalcConfig::new()
//!     .with_binary("/usr/local/bin/fpcalc")
//!     .with_length_secs(120);
//! config.validate().expect("valid config");
//! ```
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// How to invoke the Chromaprint `fpcalc` command-line tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FpcalcConfig {
    /// Executable name or path. Bare names are resolved through `PATH`.
    pub binary: PathBuf,
    /// Only fingerprint the first `length_secs` seconds of audio (`-length`).
    ///
    /// `None` keeps the tool's own default.
    pub length_secs: Option<u32>,
}

impl FpcalcConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_length_secs(mut self, length_secs: u32) -> Self {
        self.length_secs = Some(length_secs);
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ExtractionError> {
        if self.binary.as_os_str().is_empty() {
            return Err(ExtractionError::InvalidConfig(
                "binary must not be empty".into(),
            ));
        }
        if self.length_secs == Some(0) {
            return Err(ExtractionError::InvalidConfig(
                "length_secs must be >= 1".into(),
            ));
        }
        Ok(())
    }

    /// Arguments passed to the tool ahead of the audio path.
    pub(crate) fn args(&self) -> Vec<String> {
        let mut args = vec!["-json".to_string(), "-raw".to_string()];
        if let Some(secs) = self.length_secs {
            args.push("-length".to_string());
            args.push(secs.to_string());
        }
        args
    }
}

impl Default for FpcalcConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("fpcalc"),
            length_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_invokes_fpcalc_from_path() {
        let cfg = FpcalcConfig::default();
        assert_eq!(cfg.binary, PathBuf::from("fpcalc"));
        assert_eq!(cfg.length_secs, None);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.args(), vec!["-json", "-raw"]);
    }

    #[test]
    fn length_is_forwarded() {
        let cfg = FpcalcConfig::new().with_length_secs(30);
        assert_eq!(cfg.args(), vec!["-json", "-raw", "-length", "30"]);
    }

    #[test]
    fn empty_binary_is_rejected() {
        let cfg = FpcalcConfig::new().with_binary("");
        assert!(matches!(
            cfg.validate(),
            Err(ExtractionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_length_is_rejected() {
        let cfg = FpcalcConfig::new().with_length_secs(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_from_partial_json() {
        let cfg: FpcalcConfig = serde_json::from_str(r#"{"length_secs": 90}"#).unwrap();
        assert_eq!(cfg.binary, PathBuf::from("fpcalc"));
        assert_eq!(cfg.length_secs, Some(90));
    }
}
