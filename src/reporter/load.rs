//! Probe variant: measure CPU capacity and memory usage.

use std::sync::Arc;

use async_trait::async_trait;
use hyper::StatusCode;
use tracing::{debug, error};

use crate::format::{format_grouped, format_mb};
use crate::observability::Metrics;
use crate::probe::{probe_blocking, ProbeJob, ProbeResult};
use crate::server::{Handler, Reply};
use crate::system::MemoryUsage;

/// Render the `/cpu` line for a finished probe.
pub fn render_cpu_usage(result: &ProbeResult) -> String {
    format!(
        "WORKER {} CPU usage: {} operations per second\n",
        result.workers(),
        format_grouped(result.throughput())
    )
}

/// Render the `/memory` line. The system part is left out when host
/// figures are unavailable.
pub fn render_memory_usage(usage: &MemoryUsage) -> String {
    match usage.system {
        Some(system) => format!(
            "Memory usage: Alloc = {} MB, TotalSystem = {} MB, FreeSystem = {} MB\n",
            format_mb(usage.process_bytes),
            format_mb(system.total_bytes),
            format_mb(system.free_bytes)
        ),
        None => format!(
            "Memory usage: Alloc = {} MB\n",
            format_mb(usage.process_bytes)
        ),
    }
}

/// `GET /cpu` in probe mode. Every request runs a fresh probe.
pub struct CpuUsageHandler {
    job: ProbeJob,
    metrics: Arc<Metrics>,
}

impl CpuUsageHandler {
    pub fn new(job: ProbeJob, metrics: Arc<Metrics>) -> Self {
        Self { job, metrics }
    }
}

#[async_trait]
impl Handler for CpuUsageHandler {
    async fn handle(&self) -> Reply {
        match probe_blocking(self.job).await {
            Ok(result) => {
                self.metrics
                    .record_probe(result.workers(), result.throughput());
                Reply::text(render_cpu_usage(&result))
            }
            Err(e) => {
                self.metrics.record_probe_failure();
                error!("{}: {}", e.message(), e);
                Reply::error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error probing CPU: {}", e),
                )
            }
        }
    }

    fn name(&self) -> &'static str {
        "cpu_usage"
    }
}

/// `GET /memory` in probe mode.
pub struct MemoryUsageHandler;

#[async_trait]
impl Handler for MemoryUsageHandler {
    async fn handle(&self) -> Reply {
        let usage = MemoryUsage::read();
        debug!(
            process_bytes = usage.process_bytes,
            system = usage.system.is_some(),
            "memory snapshot"
        );
        Reply::text(render_memory_usage(&usage))
    }

    fn name(&self) -> &'static str {
        "memory_usage"
    }
}
