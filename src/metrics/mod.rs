//! Request statistics for the gateway.
//!
//! Totals are tracked via atomic counters so concurrent request handlers can
//! update them without locking; the status endpoint reads a point-in-time
//! snapshot.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Request statistics aggregated across all endpoints.
pub struct RequestMetrics {
    request_count: AtomicU64,
    error_count: AtomicU64,
    active_requests: AtomicU32,
    total_latency_ms: AtomicU64,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self {
            request_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            active_requests: AtomicU32::new(0),
            total_latency_ms: AtomicU64::new(0),
        }
    }

    /// Record the start of a request.
    pub fn record_request_start(&self) {
        self.active_requests.fetch_add(1, Ordering::SeqCst);
    }

    /// Record the end of a request with its latency and outcome.
    pub fn record_request_end(&self, latency_ms: u64, is_error: bool) {
        self.active_requests.fetch_sub(1, Ordering::SeqCst);
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::SeqCst);
        if is_error {
            self.error_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Get the current number of active requests
    pub fn active_requests(&self) -> u32 {
        self.active_requests.load(Ordering::SeqCst)
    }

    /// Get the total completed request count
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Point-in-time snapshot for the status endpoint.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let request_count = self.request_count.load(Ordering::SeqCst);
        let total_latency = self.total_latency_ms.load(Ordering::SeqCst);

        MetricsSnapshot {
            request_count,
            error_count: self.error_count.load(Ordering::SeqCst),
            active_requests: self.active_requests.load(Ordering::SeqCst),
            avg_latency_ms: if request_count > 0 {
                total_latency as f64 / request_count as f64
            } else {
                0.0
            },
        }
    }
}

impl Default for RequestMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub request_count: u64,
    pub error_count: u64,
    pub active_requests: u32,
    pub avg_latency_ms: f64,
}
