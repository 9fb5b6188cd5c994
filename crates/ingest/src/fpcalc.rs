//! `fpcalc` process invocation and output parsing.

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use tracing::{info, warn, Level};

use crate::config::FpcalcConfig;
use crate::error::ExtractionError;
use crate::types::{ExtractedFingerprint, FpcalcOutput};

/// Source of raw fingerprints for audio files.
///
/// [`Fpcalc`] is the production implementation; tests and embedders can plug
/// in their own.
pub trait FingerprintExtractor: Send + Sync {
    /// Fingerprint the audio file at `path`.
    fn extract(&self, path: &Path) -> Result<ExtractedFingerprint, ExtractionError>;
}

/// Extractor backed by the Chromaprint `fpcalc` command-line tool.
#[derive(Debug, Clone, Default)]
pub struct Fpcalc {
    cfg: FpcalcConfig,
}

impl Fpcalc {
    pub fn new(cfg: FpcalcConfig) -> Result<Self, ExtractionError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &FpcalcConfig {
        &self.cfg
    }
}

impl FingerprintExtractor for Fpcalc {
    fn extract(&self, path: &Path) -> Result<ExtractedFingerprint, ExtractionError> {
        extract_fingerprint(path, &self.cfg)
    }
}

/// Run `fpcalc -json -raw` on `path` and parse its output.
pub fn extract_fingerprint(
    path: &Path,
    cfg: &FpcalcConfig,
) -> Result<ExtractedFingerprint, ExtractionError> {
    let start = Instant::now();
    let span = tracing::span!(
        Level::INFO,
        "ingest.fpcalc",
        path = %path.display(),
        binary = %cfg.binary.display()
    );
    let _guard = span.enter();

    match run_fpcalc(path, cfg) {
        Ok(fp) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(
                frames = fp.fingerprint.len(),
                duration = fp.duration,
                elapsed_micros,
                "fpcalc_success"
            );
            Ok(fp)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(error = %err, elapsed_micros, "fpcalc_failure");
            Err(err)
        }
    }
}

fn run_fpcalc(path: &Path, cfg: &FpcalcConfig) -> Result<ExtractedFingerprint, ExtractionError> {
    cfg.validate()?;
    if !path.exists() {
        return Err(ExtractionError::FileNotFound(path.display().to_string()));
    }

    let output = Command::new(&cfg.binary)
        .args(cfg.args())
        .arg(path)
        .output()
        .map_err(|e| ExtractionError::ToolMissing {
            binary: cfg.binary.display().to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(ExtractionError::ToolFailed {
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    parse_fpcalc_output(&output.stdout)
}

/// Parse the JSON document printed by `fpcalc -json -raw`.
///
/// Frames printed as negative numbers are reinterpreted as the same 32-bit
/// pattern; anything outside the 32-bit range is rejected.
pub fn parse_fpcalc_output(stdout: &[u8]) -> Result<ExtractedFingerprint, ExtractionError> {
    let raw: FpcalcOutput = serde_json::from_slice(stdout)
        .map_err(|e| ExtractionError::MalformedOutput(e.to_string()))?;

    let fingerprint = raw
        .fingerprint
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            frame_from_i64(value).ok_or(ExtractionError::FrameOutOfRange { index, value })
        })
        .collect::<Result<Vec<u32>, _>>()?;

    Ok(ExtractedFingerprint {
        sample_rate: raw.sample_rate,
        duration: raw.duration,
        fingerprint,
    })
}

fn frame_from_i64(value: i64) -> Option<u32> {
    if let Ok(frame) = u32::try_from(value) {
        return Some(frame);
    }
    i32::try_from(value).ok().map(|signed| signed as u32)
}
