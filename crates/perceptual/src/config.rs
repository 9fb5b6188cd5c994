//! Configuration and error types for frame scoring.
//!
//! The scoring layer is a pure function of `(frame_a, frame_b, config)`; the
//! only state it carries is the decomposition memo, whose size is configured
//! here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::score::MAX_DIFFERENCE;

/// Default number of frames memoized by a [`crate::ChunkDecomposer`].
pub const DEFAULT_CACHE_CAPACITY: usize = 2048;

/// Thresholds and cache sizing for [`crate::MatchScorer`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScoringConfig {
    /// Configuration schema version.
    ///
    /// Bump whenever a change here can alter a similarity score.
    pub version: u32,
    /// Summed chunk differences strictly below this value score as a match.
    pub match_below: u32,
    /// Summed chunk differences strictly above this value score as a mismatch.
    pub mismatch_above: u32,
    /// Maximum number of decomposed frames kept in the LRU memo. `0` disables it.
    pub cache_capacity: usize,
}

impl ScoringConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match_below(mut self, match_below: u32) -> Self {
        self.match_below = match_below;
        self
    }

    pub fn with_mismatch_above(mut self, mismatch_above: u32) -> Self {
        self.mismatch_above = mismatch_above;
        self
    }

    /// Set the memo size. Frames repeat a lot, so a few thousand entries
    /// covers most tracks.
    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), PerceptualError> {
        if self.version < 1 {
            return Err(PerceptualError::InvalidConfigVersion {
                version: self.version,
            });
        }
        // A difference must never be able to classify as both match and mismatch.
        if self.match_below > self.mismatch_above.saturating_add(1)
            || self.mismatch_above > MAX_DIFFERENCE
        {
            return Err(PerceptualError::InvalidThresholds {
                match_below: self.match_below,
                mismatch_above: self.mismatch_above,
            });
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            version: 1,
            match_below: 16,
            mismatch_above: 32,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Errors returned by the scoring layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PerceptualError {
    #[error("invalid gray code width {width}; expected >= 1")]
    InvalidWidth { width: u32 },

    #[error(
        "invalid thresholds: match_below={match_below} mismatch_above={mismatch_above} \
         (need match_below <= mismatch_above + 1 and mismatch_above <= 48)"
    )]
    InvalidThresholds { match_below: u32, mismatch_above: u32 },

    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },
}
