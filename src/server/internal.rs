//! Health and metrics endpoints.
//!
//! Served on the main listener next to the report routes.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use hyper::StatusCode;
use serde::Serialize;

use super::response::{Reply, PROMETHEUS_TEXT};
use super::routing::Handler;
use crate::config::ReporterMode;
use crate::observability::Metrics;

/// Liveness response body.
#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    mode: &'static str,
    uptime_secs: u64,
    version: &'static str,
}

/// `GET /health`: always 200 while the process serves requests.
pub struct HealthHandler {
    mode: ReporterMode,
    started: Instant,
}

impl HealthHandler {
    pub fn new(mode: ReporterMode) -> Self {
        Self {
            mode,
            started: Instant::now(),
        }
    }
}

#[async_trait]
impl Handler for HealthHandler {
    async fn handle(&self) -> Reply {
        let status = HealthStatus {
            status: "ok",
            mode: self.mode.as_str(),
            uptime_secs: self.started.elapsed().as_secs(),
            version: crate::VERSION,
        };

        match serde_json::to_string(&status) {
            Ok(body) => Reply::json(body),
            Err(e) => Reply::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error encoding health status: {}", e),
            ),
        }
    }

    fn name(&self) -> &'static str {
        "health"
    }
}

/// `GET /metrics`: Prometheus text exposition.
pub struct MetricsHandler {
    metrics: Arc<Metrics>,
}

impl MetricsHandler {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }
}

#[async_trait]
impl Handler for MetricsHandler {
    async fn handle(&self) -> Reply {
        match self.metrics.export() {
            Ok(body) => Reply::text(body).with_content_type(PROMETHEUS_TEXT),
            Err(e) => Reply::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error exporting metrics: {}", e),
            ),
        }
    }

    fn name(&self) -> &'static str {
        "metrics"
    }
}
