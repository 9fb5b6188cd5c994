use serde::{Deserialize, Serialize};

/// Result of fingerprinting one audio file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFingerprint {
    /// Sample rate reported by the tool, when it reports one.
    pub sample_rate: Option<u32>,
    /// Audio duration in seconds.
    pub duration: f64,
    /// Raw fingerprint frames.
    pub fingerprint: Vec<u32>,
}

/// Shape of `fpcalc -json -raw` output. Frames are read as `i64` because some
/// builds print them as signed 32-bit integers.
#[derive(Debug, Deserialize)]
pub(crate) struct FpcalcOutput {
    pub duration: f64,
    pub fingerprint: Vec<i64>,
    #[serde(default)]
    pub sample_rate: Option<u32>,
}
