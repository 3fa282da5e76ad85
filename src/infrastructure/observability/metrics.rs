//! Memoization metrics
//!
//! Metrics are emitted through the `metrics` facade; installing a recorder
//! (Prometheus or otherwise) is left to the host application.

use std::time::Duration;

use metrics::{counter, histogram};

/// Result of a cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResult {
    Hit,
    Miss,
}

impl LookupResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
        }
    }
}

/// Store operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStage {
    Get,
    Set,
}

impl StoreStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
        }
    }
}

/// Record a cache lookup for a memoized operation
pub fn record_lookup(operation: &str, result: LookupResult) {
    let labels = [("operation", operation.to_string())];

    match result {
        LookupResult::Hit => counter!("memo_cache_hits_total", &labels).increment(1),
        LookupResult::Miss => counter!("memo_cache_misses_total", &labels).increment(1),
    }
}

/// Record an invocation of the underlying operation after a miss
pub fn record_invocation(operation: &str, success: bool, duration: Duration) {
    let labels = [
        ("operation", operation.to_string()),
        ("status", if success { "success" } else { "failure" }.to_string()),
    ];

    counter!("memo_invocations_total", &labels).increment(1);
    histogram!("memo_invocation_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record a store fault that was degraded to a miss or a skipped write
pub fn record_store_error(operation: &str, stage: StoreStage) {
    let labels = [
        ("operation", operation.to_string()),
        ("stage", stage.as_str().to_string()),
    ];

    counter!("memo_cache_store_errors_total", &labels).increment(1);
}
