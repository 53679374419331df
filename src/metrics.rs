// Metrics hooks for the matching engine.
//
// Callers install a global `RunMetrics` implementation via [`set_run_metrics`],
// after which every `MatchEngine::run` reports its latency, comparison count,
// and match count. This keeps instrumentation decoupled from any specific
// metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Metrics observer for matching runs.
pub trait RunMetrics: Send + Sync {
    /// Record the outcome of one completed run.
    ///
    /// `latency` is the wall-clock duration of the run, `pairs_scored` is the
    /// size of the cross product that was scanned, and `matches_found` is the
    /// number of new match records the run created.
    fn record_run(&self, latency: Duration, pairs_scored: usize, matches_found: usize);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn RunMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn RunMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn RunMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global run metrics recorder.
///
/// Typically called once during service startup so every engine instance
/// reports to the same backend.
pub fn set_run_metrics(recorder: Option<Arc<dyn RunMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().expect("run metrics lock poisoned");
    *guard = recorder;
}
