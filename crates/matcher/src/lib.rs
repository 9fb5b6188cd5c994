//! # Chromalign Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` turns two acoustic fingerprints into a single similarity value.
//! Fingerprints of the same recording rarely line up frame for frame: tracks
//! differ in length, and silence trimming shifts one against the other. The
//! matcher therefore globally aligns the two frame sequences, tolerating
//! insertions and deletions, and normalizes the alignment score by the
//! alignment length.
//!
//! ## Core Types
//!
//! - [`Matcher`]: owns a [`perceptual::MatchScorer`] (with its decomposition
//!   memo) and an [`AlignConfig`]; exposes [`Matcher::align`],
//!   [`Matcher::compare`] and [`Matcher::similarity`].
//! - [`align()`]: generic global alignment over any element type and
//!   substitution function, with affine gaps and a fixed tie-break order
//!   (diagonal, up, left).
//! - [`Alignment`]: the optimal path as [`Step`]s plus its total score;
//!   [`Alignment::columns`] resolves it into [`AlignedColumn`]s holding
//!   [`Slot::Frame`] or [`Slot::Gap`].
//! - [`SimilarityReport`]: score, alignment length, pair/gap counts and the
//!   normalized similarity.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{AlignConfig, Matcher};
//! use perceptual::ScoringConfig;
//!
//! let matcher = Matcher::new(&ScoringConfig::default(), AlignConfig::default()).unwrap();
//!
//! // One extra frame: two matches and one gap run (-2) over three columns.
//! let report = matcher.compare(&[0, 0, 0], &[0, 0]).unwrap();
//! assert_eq!(report.score, 0);
//! assert_eq!(report.alignment_length, 3);
//! assert_eq!(report.similarity, 0.0);
//!
//! assert_eq!(matcher.similarity(&[7, 8, 9], &[7, 8, 9]).unwrap(), 1.0);
//! ```
//!
//! ## Observability
//!
//! Install a [`SimilarityMetrics`] implementation via
//! [`set_similarity_metrics`] to record per-comparison latency and outcome.

pub mod align;
pub mod engine;
pub mod metrics;
pub mod types;

pub use crate::align::align;
pub use crate::engine::{compute_similarity, Matcher};
pub use crate::metrics::{set_similarity_metrics, SimilarityMetrics};
pub use crate::types::{
    AlignConfig, AlignedColumn, Alignment, MatchError, SimilarityReport, Slot, Step,
};
