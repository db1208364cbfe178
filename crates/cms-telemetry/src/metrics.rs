//! Prometheus metrics for the CMS services.
//!
//! All metrics follow the naming convention: `cms_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., rpc_requests_total)
//! - **Histogram**: Distribution of values (e.g., rpc_request_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // GATEWAY METRICS
    // =========================================================================

    /// RPC calls by method and outcome (ok / error kind)
    pub static ref RPC_REQUESTS: CounterVec = CounterVec::new(
        Opts::new("cms_rpc_requests_total", "RPC calls by method and outcome"),
        &["method", "outcome"]
    ).expect("metric creation failed");

    /// RPC latency
    pub static ref RPC_REQUEST_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "cms_rpc_request_duration_seconds",
            "Time spent handling RPC calls"
        ).buckets(exponential_buckets(0.0005, 2.0, 14).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // ORDERED COLLECTION METRICS
    // =========================================================================

    /// Records whose order_index was rewritten by a reorder or compaction
    pub static ref RECORDS_REINDEXED: CounterVec = CounterVec::new(
        Opts::new("cms_records_reindexed_total", "Records renumbered by reorder or delete"),
        &["collection"]
    ).expect("metric creation failed");

    /// Appends that lost an order_index race and were retried
    pub static ref APPEND_CONFLICTS: CounterVec = CounterVec::new(
        Opts::new("cms_append_conflicts_total", "Append attempts that hit an order_index conflict"),
        &["collection"]
    ).expect("metric creation failed");

    // =========================================================================
    // NEWS METRICS
    // =========================================================================

    /// Article status transitions that were written
    pub static ref ARTICLE_STATUS_CHANGES: CounterVec = CounterVec::new(
        Opts::new("cms_news_status_changes_total", "Article status transitions by source and target"),
        &["from", "to"]
    ).expect("metric creation failed");

    // =========================================================================
    // MEDIA METRICS
    // =========================================================================

    /// Objects that could not be deleted and must be swept later
    pub static ref ORPHANED_OBJECTS: Counter = Counter::new(
        "cms_media_orphaned_objects_total",
        "Stored objects left behind after a failed best-effort delete"
    ).expect("metric creation failed");

    /// Presigned upload URLs issued
    pub static ref UPLOADS_PRESIGNED: CounterVec = CounterVec::new(
        Opts::new("cms_media_uploads_presigned_total", "Presigned upload URLs issued"),
        &["folder"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling it twice returns an `AlreadyReg` error from the second call.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(RPC_REQUESTS.clone()),
        Box::new(RPC_REQUEST_DURATION.clone()),
        Box::new(RECORDS_REINDEXED.clone()),
        Box::new(APPEND_CONFLICTS.clone()),
        Box::new(ARTICLE_STATUS_CHANGES.clone()),
        Box::new(ORPHANED_OBJECTS.clone()),
        Box::new(UPLOADS_PRESIGNED.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}
