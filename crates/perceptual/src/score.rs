//! Frame-to-frame match scoring.
//!
//! Two frames are compared chunk by chunk on their Gray ranks. The summed
//! absolute rank difference (`0..=48`) is classified into a ternary score:
//! below `match_below` is a match, above `mismatch_above` is a mismatch, and
//! anything in between is neutral so ambiguous frames neither reward nor
//! penalize an alignment.

use serde::{Deserialize, Serialize};

use crate::chunks::{ChunkDecomposer, Chunks};
use crate::config::{PerceptualError, ScoringConfig};

/// Largest possible summed rank difference between two frames (16 chunks x 3).
pub const MAX_DIFFERENCE: u32 = 48;

/// Ternary classification of a frame pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchScore {
    Mismatch,
    Neutral,
    Match,
}

impl MatchScore {
    /// Numeric contribution to an alignment score: `-1`, `0` or `+1`.
    #[inline]
    pub fn value(self) -> i32 {
        match self {
            MatchScore::Mismatch => -1,
            MatchScore::Neutral => 0,
            MatchScore::Match => 1,
        }
    }
}

/// Sum of per-chunk absolute rank differences.
#[inline]
pub fn chunk_difference(a: &Chunks, b: &Chunks) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| u32::from(x.abs_diff(y)))
        .sum()
}

/// Scores frame pairs using a (cached) [`ChunkDecomposer`] and fixed thresholds.
#[derive(Debug)]
pub struct MatchScorer {
    decomposer: ChunkDecomposer,
    match_below: u32,
    mismatch_above: u32,
}

impl MatchScorer {
    /// Build a scorer from a validated [`ScoringConfig`].
    pub fn new(cfg: &ScoringConfig) -> Result<Self, PerceptualError> {
        cfg.validate()?;
        Ok(Self::from_validated(cfg))
    }

    fn from_validated(cfg: &ScoringConfig) -> Self {
        Self {
            decomposer: ChunkDecomposer::new(cfg.cache_capacity),
            match_below: cfg.match_below,
            mismatch_above: cfg.mismatch_above,
        }
    }

    /// Classify a summed chunk difference.
    #[inline]
    pub fn classify(&self, difference: u32) -> MatchScore {
        if difference < self.match_below {
            MatchScore::Match
        } else if difference > self.mismatch_above {
            MatchScore::Mismatch
        } else {
            MatchScore::Neutral
        }
    }

    /// Score two raw frames.
    pub fn score(&self, a: u32, b: u32) -> MatchScore {
        let ca = self.decomposer.decompose(a);
        let cb = self.decomposer.decompose(b);
        self.score_chunks(&ca, &cb)
    }

    /// Score two already-decomposed frames.
    #[inline]
    pub fn score_chunks(&self, a: &Chunks, b: &Chunks) -> MatchScore {
        self.classify(chunk_difference(a, b))
    }

    /// The decomposer backing this scorer.
    pub fn decomposer(&self) -> &ChunkDecomposer {
        &self.decomposer
    }
}

impl Default for MatchScorer {
    fn default() -> Self {
        // The default config always validates.
        Self::from_validated(&ScoringConfig::default())
    }
}
