//! Chromalign Ingest Layer
//!
//! This is where fingerprints enter Chromalign. Audio decoding and
//! fingerprinting belong to Chromaprint's `fpcalc` tool; this crate only runs
//! it and turns its JSON output into typed frames that the matcher can align.
//!
//! ## What we do here
//!
//! - **Invoke the tool** - `fpcalc -json -raw [-length N] <file>`, with the
//!   binary path and length taken from [`FpcalcConfig`].
//! - **Parse output** - duration and the raw `u32` frame list, accepting
//!   frames printed as signed integers.
//! - **Type failures** - a missing tool, a non-zero exit and malformed output
//!   are distinct [`ExtractionError`] variants.
//! - **Log** - one `ingest.fpcalc` span per invocation with success/failure
//!   events via tracing.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use ingest::{FingerprintExtractor, Fpcalc, FpcalcConfig};
//!
//! let fpcalc = Fpcalc::new(FpcalcConfig::default()).unwrap();
//! let fp = fpcalc.extract(Path::new("track.flac")).unwrap();
//! println!("{} frames over {:.1}s", fp.fingerprint.len(), fp.duration);
//! ```
mod config;
mod error;
mod fpcalc;
mod types;

pub use crate::config::FpcalcConfig;
pub use crate::error::ExtractionError;
pub use crate::fpcalc::{extract_fingerprint, parse_fpcalc_output, FingerprintExtractor, Fpcalc};
pub use crate::types::ExtractedFingerprint;
