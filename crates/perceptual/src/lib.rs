//! # Chromalign Perceptual Frame Scoring
//!
//! This crate scores pairs of Chromaprint frames for the alignment layer. A
//! frame is a `u32` packing 16 independent 2-bit sub-fingerprints; two frames
//! are close when their sub-fingerprints are close.
//!
//! ## Contract
//!
//! - Input is raw fingerprint frames as produced by an upstream extractor.
//!   This crate never decodes audio or parses extractor output.
//! - Scoring is a pure function of `(frame_a, frame_b, config)`. The LRU memo
//!   inside [`ChunkDecomposer`] is never observable in results.
//!
//! ## Pipeline
//!
//! 1.  **Gray ranking**: each 2-bit chunk value is replaced by its position
//!     in the reflected binary sequence `00, 01, 11, 10`, so one bit flip is
//!     always a rank step of one (see [`gray`]).
//! 2.  **Decomposition**: a frame becomes a [`Chunks`] array of 16 ranks,
//!     lowest bits first.
//! 3.  **Classification**: the summed absolute rank difference (`0..=48`) is
//!     mapped to [`MatchScore::Match`] below 16, [`MatchScore::Mismatch`] above
//!     32 and [`MatchScore::Neutral`] otherwise.
//!
//! ## Example Usage
//!
//! ```
//! use perceptual::{MatchScore, MatchScorer, ScoringConfig};
//!
//! let scorer = MatchScorer::new(&ScoringConfig::default()).unwrap();
//!
//! assert_eq!(scorer.score(0xDEAD_BEEF, 0xDEAD_BEEF), MatchScore::Match);
//! assert_eq!(scorer.score(0x0000_0000, 0xAAAA_AAAA), MatchScore::Mismatch);
//! ```
pub mod chunks;
pub mod config;
pub mod gray;
pub mod score;

pub use crate::chunks::{compose, decompose, ChunkDecomposer, Chunks, CHUNK_COUNT};
pub use crate::config::{PerceptualError, ScoringConfig, DEFAULT_CACHE_CAPACITY};
pub use crate::gray::{gray_code, rank_table, GRAY_RANK};
pub use crate::score::{chunk_difference, MatchScore, MatchScorer, MAX_DIFFERENCE};
