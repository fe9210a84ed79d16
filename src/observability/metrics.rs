//! Prometheus metrics for resource_probe.
//!
//! Request rate, errors and latency per route, plus the outcome of the
//! most recent capacity probe.

use prometheus::{
    Counter, CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};

/// Route label used for every path without a registered handler.
pub const UNMATCHED_ROUTE: &str = "other";

/// Prometheus metrics registry with all application metrics.
pub struct Metrics {
    registry: Registry,

    /// Total HTTP requests by route and status
    pub http_requests_total: CounterVec,

    /// HTTP request duration in seconds
    pub http_request_duration_seconds: HistogramVec,

    /// Completed capacity probes by outcome
    pub probe_runs_total: CounterVec,

    /// Throughput reported by the last successful probe
    pub last_probe_ops_per_second: Gauge,

    /// Worker count of the last successful probe
    pub last_probe_workers: Gauge,

    /// Failed control-file reads
    pub resource_read_errors_total: Counter,
}

impl Metrics {
    /// Create a new metrics registry with all metrics.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Probe requests take the full probe duration; keep buckets past 5s.
        let http_buckets = vec![
            0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 7.5, 10.0,
        ];

        let http_requests_total = CounterVec::new(
            Opts::new("resource_probe_http_requests_total", "Total HTTP requests"),
            &["route", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "resource_probe_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(http_buckets),
            &["route"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let probe_runs_total = CounterVec::new(
            Opts::new(
                "resource_probe_probe_runs_total",
                "Completed capacity probes",
            ),
            &["status"],
        )?;
        registry.register(Box::new(probe_runs_total.clone()))?;

        let last_probe_ops_per_second = Gauge::new(
            "resource_probe_last_probe_ops_per_second",
            "Aggregate throughput of the last successful probe",
        )?;
        registry.register(Box::new(last_probe_ops_per_second.clone()))?;

        let last_probe_workers = Gauge::new(
            "resource_probe_last_probe_workers",
            "Worker count of the last successful probe",
        )?;
        registry.register(Box::new(last_probe_workers.clone()))?;

        let resource_read_errors_total = Counter::new(
            "resource_probe_resource_read_errors_total",
            "Failed cgroup control-file reads",
        )?;
        registry.register(Box::new(resource_read_errors_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            probe_runs_total,
            last_probe_ops_per_second,
            last_probe_workers,
            resource_read_errors_total,
        })
    }

    /// Record one served request. `route` must be a registered path or
    /// [`UNMATCHED_ROUTE`] to keep label cardinality bounded.
    pub fn record_http_request(&self, route: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();

        self.http_requests_total
            .with_label_values(&[route, &status_str])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[route])
            .observe(duration_secs);
    }

    /// Record a successful probe.
    pub fn record_probe(&self, workers: usize, ops_per_sec: f64) {
        self.probe_runs_total.with_label_values(&["success"]).inc();
        self.last_probe_ops_per_second.set(ops_per_sec);
        self.last_probe_workers.set(workers as f64);
    }

    /// Record a failed probe.
    pub fn record_probe_failure(&self) {
        self.probe_runs_total.with_label_values(&["error"]).inc();
    }

    /// Record a failed control-file read.
    pub fn record_read_error(&self) {
        self.resource_read_errors_total.inc();
    }

    /// Export metrics in Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Get the Prometheus registry (for custom metrics).
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
