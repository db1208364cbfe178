//! Gateway metrics.
//!
//! In-process atomic counters for the gateway itself, plus the shared
//! Prometheus series from `cms-telemetry`. Both are served at `GET /metrics`.

use cms_telemetry::{metric_inc, HistogramTimer, RPC_REQUESTS, RPC_REQUEST_DURATION};
use shared_types::ErrorKind;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// API Gateway metrics
#[derive(Default)]
pub struct GatewayMetrics {
    // Request counters
    pub requests_total: AtomicU64,
    pub requests_success: AtomicU64,
    pub requests_error: AtomicU64,

    // Write request counters
    pub write_requests_total: AtomicU64,

    // Rejections
    pub unauthorized_total: AtomicU64,
    pub timeouts_total: AtomicU64,

    // Latency tracking (simplified - the histogram lives in cms-telemetry)
    pub total_latency_ms: AtomicU64,
    pub request_count_for_latency: AtomicU64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request
    pub fn record_request(&self, success: bool, is_write: bool, latency_ms: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);

        if success {
            self.requests_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_error.fetch_add(1, Ordering::Relaxed);
        }

        if is_write {
            self.write_requests_total.fetch_add(1, Ordering::Relaxed);
        }

        self.total_latency_ms
            .fetch_add(latency_ms, Ordering::Relaxed);
        self.request_count_for_latency
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Record a staff method called without a valid session
    pub fn record_unauthorized(&self) {
        self.unauthorized_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request cut off by the timeout layer
    pub fn record_timeout(&self) {
        self.timeouts_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Get average latency in ms
    pub fn average_latency_ms(&self) -> f64 {
        let total = self.total_latency_ms.load(Ordering::Relaxed);
        let count = self.request_count_for_latency.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Export metrics in Prometheus format
    pub fn to_prometheus(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "# HELP cms_gateway_requests_total Total number of RPC calls\n\
             # TYPE cms_gateway_requests_total counter\n\
             cms_gateway_requests_total {}\n",
            self.requests_total.load(Ordering::Relaxed)
        ));

        output.push_str(&format!(
            "# HELP cms_gateway_requests_error_total Failed RPC calls\n\
             # TYPE cms_gateway_requests_error_total counter\n\
             cms_gateway_requests_error_total {}\n",
            self.requests_error.load(Ordering::Relaxed)
        ));

        output.push_str(&format!(
            "# HELP cms_gateway_write_requests_total RPC calls that change content\n\
             # TYPE cms_gateway_write_requests_total counter\n\
             cms_gateway_write_requests_total {}\n",
            self.write_requests_total.load(Ordering::Relaxed)
        ));

        output.push_str(&format!(
            "# HELP cms_gateway_unauthorized_total Staff calls without a session\n\
             # TYPE cms_gateway_unauthorized_total counter\n\
             cms_gateway_unauthorized_total {}\n",
            self.unauthorized_total.load(Ordering::Relaxed)
        ));

        output.push_str(&format!(
            "# HELP cms_gateway_timeouts_total Requests cut off by the timeout\n\
             # TYPE cms_gateway_timeouts_total counter\n\
             cms_gateway_timeouts_total {}\n",
            self.timeouts_total.load(Ordering::Relaxed)
        ));

        output.push_str(&format!(
            "# HELP cms_gateway_average_latency_ms Average RPC latency\n\
             # TYPE cms_gateway_average_latency_ms gauge\n\
             cms_gateway_average_latency_ms {:.2}\n",
            self.average_latency_ms()
        ));

        output
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "requests": {
                "total": self.requests_total.load(Ordering::Relaxed),
                "success": self.requests_success.load(Ordering::Relaxed),
                "error": self.requests_error.load(Ordering::Relaxed),
                "writes": self.write_requests_total.load(Ordering::Relaxed),
            },
            "rejected": {
                "unauthorized": self.unauthorized_total.load(Ordering::Relaxed),
                "timeouts": self.timeouts_total.load(Ordering::Relaxed),
            },
            "latency": {
                "average_ms": self.average_latency_ms(),
            }
        })
    }
}

/// Times one RPC call and records it in both metric sets.
pub struct RequestTimer {
    start: Instant,
    metrics: Arc<GatewayMetrics>,
    method: &'static str,
    is_write: bool,
    _histogram: HistogramTimer,
}

impl RequestTimer {
    /// `method` must come from the method table (or be `"unknown"`) so
    /// the label set stays bounded.
    pub fn new(metrics: Arc<GatewayMetrics>, method: &'static str, is_write: bool) -> Self {
        Self {
            start: Instant::now(),
            metrics,
            method,
            is_write,
            _histogram: HistogramTimer::new(&RPC_REQUEST_DURATION),
        }
    }

    pub fn finish(self, outcome: Result<(), ErrorKind>) {
        let latency_ms = self.start.elapsed().as_millis() as u64;
        self.metrics
            .record_request(outcome.is_ok(), self.is_write, latency_ms);
        let label = match outcome {
            Ok(()) => "OK",
            Err(kind) => kind.as_str(),
        };
        metric_inc!(RPC_REQUESTS, &[self.method, label]);
    }
}
