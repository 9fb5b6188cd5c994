use std::time::Instant;

use perceptual::{MatchScorer, ScoringConfig};
use tracing::debug;

use crate::align::align;
use crate::metrics::metrics_recorder;
use crate::types::{AlignConfig, Alignment, MatchError, SimilarityReport};


/// Compares fingerprints by globally aligning their frames.
///
/// A `Matcher` owns its [`MatchScorer`] and therefore its decomposition memo;
/// reusing one matcher across many comparisons keeps the memo warm. It is
/// `Sync`, so a single instance can serve concurrent callers.
#[derive(Debug)]
pub struct Matcher {
    scorer: MatchScorer,
    align_cfg: AlignConfig,
}

impl Matcher {
    /// Construct a matcher from explicit configs.
    pub fn new(scoring_cfg: &ScoringConfig, align_cfg: AlignConfig) -> Result<Self, MatchError> {
        align_cfg.validate()?;
        Ok(Self::from_parts(MatchScorer::new(scoring_cfg)?, align_cfg))
    }

    fn from_parts(scorer: MatchScorer, align_cfg: AlignConfig) -> Self {
        Self { scorer, align_cfg }
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    pub fn align_config(&self) -> &AlignConfig {
        &self.align_cfg
    }

    /// Align two fingerprints frame by frame.
    ///
    /// Empty input is rejected by [`align()`] with the frame counts unchanged,
    /// since every frame decomposes to exactly one chunk array.
    pub fn align(&self, first: &[u32], second: &[u32]) -> Result<Alignment, MatchError> {
        // Decompose each distinct frame once up front; the DP then only
        // compares chunk arrays.
        let decomposer = self.scorer.decomposer();
        let a = decomposer.decompose_all(first);
        let b = decomposer.decompose_all(second);
        align(
            &a,
            &b,
            |x, y| self.scorer.score_chunks(x, y).value(),
            &self.align_cfg,
        )
    }

    /// Full comparison: alignment score, length, and normalized similarity.
    pub fn compare(&self, first: &[u32], second: &[u32]) -> Result<SimilarityReport, MatchError> {
        let start = Instant::now();
        let result = self.compare_inner(first, second);

        if let Some(recorder) = metrics_recorder() {
            recorder.record_comparison(
                first.len(),
                second.len(),
                start.elapsed(),
                result.as_ref().map(|r| r.similarity).map_err(|e| e.clone()),
            );
        }
        result
    }

    fn compare_inner(&self, first: &[u32], second: &[u32]) -> Result<SimilarityReport, MatchError> {
        let alignment = self.align(first, second)?;
        if alignment.is_empty() {
            return Err(MatchError::ZeroLengthAlignment);
        }
        let similarity = alignment.score() as f64 / alignment.len() as f64;

        debug!(
            first_len = first.len(),
            second_len = second.len(),
            score = alignment.score(),
            alignment_len = alignment.len(),
            similarity,
            "fingerprints_aligned"
        );

        Ok(SimilarityReport {
            score: alignment.score(),
            alignment_length: alignment.len(),
            paired: alignment.pairs(),
            gaps: alignment.gaps(),
            similarity,
        })
    }

    /// Normalized similarity: alignment score divided by alignment length.
    ///
    /// Identical fingerprints score exactly `1.0`. Mismatches and gap penalties
    /// push the value negative, and with short gap runs it can fall below `-1`.
    pub fn similarity(&self, first: &[u32], second: &[u32]) -> Result<f64, MatchError> {
        self.compare(first, second).map(|report| report.similarity)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::from_parts(MatchScorer::default(), AlignConfig::default())
    }
}

/// Similarity of two fingerprints under the default scoring and gap model.
///
/// Builds a fresh [`Matcher`] per call; hold on to a `Matcher` instead when
/// comparing many fingerprints.
pub fn compute_similarity(first: &[u32], second: &[u32]) -> Result<f64, MatchError> {
    Matcher::default().similarity(first, second)
}
