//! Workspace umbrella crate for Chromalign.
//!
//! This crate stitches together fingerprint extraction (`ingest`), frame
//! scoring (`perceptual`) and global alignment (`matcher`) so callers can
//! compare two audio files, or two raw fingerprints, with a single call.

pub mod config;

pub use crate::config::{ChromalignConfig, ConfigLoadError, LoggingConfig};
pub use ingest::{
    ExtractedFingerprint, ExtractionError, FingerprintExtractor, Fpcalc, FpcalcConfig,
    extract_fingerprint, parse_fpcalc_output,
};
pub use matcher::{
    AlignConfig, AlignedColumn, Alignment, MatchError, Matcher, SimilarityMetrics, SimilarityReport,
    Slot, Step, align, compute_similarity, set_similarity_metrics,
};
pub use perceptual::{
    ChunkDecomposer, Chunks, MatchScore, MatchScorer, PerceptualError, ScoringConfig, compose,
    decompose, gray_code,
};

use std::error::Error;
use std::fmt;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{Level, info, warn};

/// Errors that can occur while comparing two audio files.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Extraction {
        path: String,
        source: ExtractionError,
    },
    Match(MatchError),
    Config(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Extraction { path, source } => {
                write!(f, "fingerprint extraction failed for {path}: {source}")
            }
            PipelineError::Match(err) => write!(f, "similarity scoring failed: {err}"),
            PipelineError::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Extraction { source, .. } => Some(source),
            PipelineError::Match(err) => Some(err),
            PipelineError::Config(_) => None,
        }
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

impl From<ConfigLoadError> for PipelineError {
    fn from(value: ConfigLoadError) -> Self {
        PipelineError::Config(value.to_string())
    }
}

/// What was extracted for one side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub path: String,
    pub duration: f64,
    pub frames: usize,
}

/// Result of comparing two audio files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub first: TrackSummary,
    pub second: TrackSummary,
    #[serde(flatten)]
    pub result: SimilarityReport,
}

impl ComparisonReport {
    pub fn similarity(&self) -> f64 {
        self.result.similarity
    }
}

/// Render a similarity with its fractional part kept, so whole values print
/// as `1.0` rather than `1`.
pub fn format_score(value: f64) -> String {
    if value.is_finite() {
        format!("{value:?}")
    } else {
        value.to_string()
    }
}

/// Extracts fingerprints for two files and compares them.
///
/// Holds one [`Matcher`], so the decomposition memo stays warm across
/// repeated comparisons.
pub struct Comparator<E: FingerprintExtractor = Fpcalc> {
    extractor: E,
    matcher: Matcher,
}

impl Comparator<Fpcalc> {
    /// Build an `fpcalc`-backed comparator from a validated config.
    pub fn from_config(cfg: &ChromalignConfig) -> Result<Self, PipelineError> {
        cfg.validate()?;
        let extractor = Fpcalc::new(cfg.fpcalc.clone())
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        Ok(Self::with_extractor(extractor, cfg.matcher()?))
    }
}

impl<E: FingerprintExtractor> Comparator<E> {
    pub fn with_extractor(extractor: E, matcher: Matcher) -> Self {
        Self { extractor, matcher }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Fingerprint both files and report their similarity.
    pub fn compare_files(
        &self,
        first: &Path,
        second: &Path,
    ) -> Result<ComparisonReport, PipelineError> {
        let start = Instant::now();
        let span = tracing::span!(
            Level::INFO,
            "chromalign.compare",
            first = %first.display(),
            second = %second.display()
        );
        let _guard = span.enter();

        match self.compare_inner(first, second) {
            Ok(report) => {
                info!(
                    similarity = report.result.similarity,
                    score = report.result.score,
                    alignment_len = report.result.alignment_length,
                    elapsed_micros = start.elapsed().as_micros(),
                    "comparison_success"
                );
                Ok(report)
            }
            Err(err) => {
                warn!(
                    error = %err,
                    elapsed_micros = start.elapsed().as_micros(),
                    "comparison_failure"
                );
                Err(err)
            }
        }
    }

    fn compare_inner(
        &self,
        first: &Path,
        second: &Path,
    ) -> Result<ComparisonReport, PipelineError> {
        let fp1 = self.extract(first)?;
        let fp2 = self.extract(second)?;
        let result = self.matcher.compare(&fp1.fingerprint, &fp2.fingerprint)?;

        Ok(ComparisonReport {
            first: summarize(first, &fp1),
            second: summarize(second, &fp2),
            result,
        })
    }

    fn extract(&self, path: &Path) -> Result<ExtractedFingerprint, PipelineError> {
        self.extractor
            .extract(path)
            .map_err(|source| PipelineError::Extraction {
                path: path.display().to_string(),
                source,
            })
    }
}

fn summarize(path: &Path, fp: &ExtractedFingerprint) -> TrackSummary {
    TrackSummary {
        path: path.display().to_string(),
        duration: fp.duration,
        frames: fp.fingerprint.len(),
    }
}

/// Compare two audio files end-to-end with explicit configuration.
pub fn compare_files(
    first: &Path,
    second: &Path,
    cfg: &ChromalignConfig,
) -> Result<ComparisonReport, PipelineError> {
    Comparator::from_config(cfg)?.compare_files(first, second)
}
