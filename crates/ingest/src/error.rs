//! Error types produced by the ingest crate.
//!
//! Every failure of the upstream fingerprint provider maps to one
//! [`ExtractionError`] variant. Errors are cloneable and comparable so callers
//! and tests can match on them precisely.
//!
//! | Error | Cause |
//! |-------|-------|
//! | [`ToolMissing`](ExtractionError::ToolMissing) | `fpcalc` binary could not be spawned |
//! | [`ToolFailed`](ExtractionError::ToolFailed) | `fpcalc` exited with a non-zero status |
//! | [`MalformedOutput`](ExtractionError::MalformedOutput) | stdout was not the expected JSON |
//! | [`FrameOutOfRange`](ExtractionError::FrameOutOfRange) | a frame does not fit in 32 bits |
//! | [`FileNotFound`](ExtractionError::FileNotFound) | the audio path does not exist |
use thiserror::Error;

/// Errors surfaced while obtaining a fingerprint from the external tool.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("fingerprint tool `{binary}` could not be started: {reason}")]
    ToolMissing { binary: String, reason: String },

    #[error("fingerprint tool exited with status {status:?}: {stderr}")]
    ToolFailed { status: Option<i32>, stderr: String },

    #[error("malformed fingerprint tool output: {0}")]
    MalformedOutput(String),

    #[error("fingerprint frame {index} out of 32-bit range: {value}")]
    FrameOutOfRange { index: usize, value: i64 },

    #[error("audio file not found: {0}")]
    FileNotFound(String),

    #[error("invalid fpcalc config: {0}")]
    InvalidConfig(String),
}
