//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chromalign::{ExtractedFingerprint, ExtractionError, FingerprintExtractor};

/// Frame far enough from zero in every chunk to score as a mismatch.
pub const MISMATCH: u32 = 0xAAAA_AAAA;

/// Deterministic pseudo-random frames (xorshift).
pub fn synthetic_fingerprint(len: usize, seed: u32) -> Vec<u32> {
    let mut state = seed | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state
        })
        .collect()
}

/// In-memory extractor keyed by path.
#[derive(Default)]
pub struct StubExtractor {
    tracks: HashMap<PathBuf, Vec<u32>>,
}

impl StubExtractor {
    pub fn with_track(mut self, path: &str, fingerprint: Vec<u32>) -> Self {
        self.tracks.insert(PathBuf::from(path), fingerprint);
        self
    }
}

impl FingerprintExtractor for StubExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedFingerprint, ExtractionError> {
        let fingerprint = self
            .tracks
            .get(path)
            .cloned()
            .ok_or_else(|| ExtractionError::FileNotFound(path.display().to_string()))?;
        Ok(ExtractedFingerprint {
            sample_rate: None,
            duration: fingerprint.len() as f64 * 0.1238,
            fingerprint,
        })
    }
}

/// Stand-in `fpcalc` that echoes the "audio" file, which already holds the
/// tool's JSON output.
const FAKE_FPCALC: &str = r#"#!/bin/sh
[ "$1" = "-json" ] && [ "$2" = "-raw" ] || exit 3
for last; do :; done
cat "$last"
"#;

#[cfg(unix)]
pub fn write_fake_fpcalc(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fpcalc");
    fs::write(&path, FAKE_FPCALC).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Write a track file holding `fpcalc -json -raw` output for `fingerprint`.
pub fn write_track(dir: &Path, name: &str, fingerprint: &[i64]) -> PathBuf {
    let path = dir.join(name);
    let json = serde_json::json!({ "duration": 4.2, "fingerprint": fingerprint });
    fs::write(&path, json.to_string()).unwrap();
    path
}
