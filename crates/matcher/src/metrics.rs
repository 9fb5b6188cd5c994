// Metrics hooks for the `matcher` crate.
//
// Callers install a global `SimilarityMetrics` implementation via
// [`set_similarity_metrics`]; every `Matcher::compare` call then reports its
// input sizes, latency and outcome.
use std::sync::{Arc, OnceLock, RwLock};
use std::time::Duration;

use crate::types::MatchError;

/// Metrics observer for fingerprint comparisons.
pub trait SimilarityMetrics: Send + Sync {
    /// Record the outcome of one comparison.
    ///
    /// `first_len` and `second_len` are the frame counts of the inputs and
    /// `latency` covers decomposition, alignment and normalization.
    fn record_comparison(
        &self,
        first_len: usize,
        second_len: usize,
        latency: Duration,
        result: Result<f64, MatchError>,
    );
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn SimilarityMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn SimilarityMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn SimilarityMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global similarity metrics recorder.
pub fn set_similarity_metrics(recorder: Option<Arc<dyn SimilarityMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
