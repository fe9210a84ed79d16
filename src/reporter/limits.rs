//! Limits variant: report cgroup ceilings.

use std::sync::Arc;

use async_trait::async_trait;
use hyper::StatusCode;
use tracing::{debug, warn};

use crate::observability::Metrics;
use crate::server::{Handler, Reply};
use crate::system::{memory_limit_display, CgroupReader, CpuLimit, ResourceError};

/// Render the `/cpu` line for a CPU limit.
pub fn render_cpu_limit(limit: CpuLimit) -> String {
    match limit {
        CpuLimit::Unlimited => "No CPU limit\n".to_string(),
        CpuLimit::Cores(cores) => format!("CPU limit: {:.2} cores\n", cores),
    }
}

/// Render the `/memory` line for a memory limit.
pub fn render_memory_limit(bytes: u64) -> String {
    format!("Memory limit: {} bytes\n", bytes)
}

fn read_failure(metrics: &Metrics, what: &str, err: &ResourceError) -> Reply {
    metrics.record_read_error();
    warn!(path = %err.path().display(), "Failed to read {}: {}", what, err);
    Reply::error(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Error getting {}: {}", what, err),
    )
}

/// `GET /cpu` in limits mode.
pub struct CpuLimitHandler {
    reader: Arc<CgroupReader>,
    metrics: Arc<Metrics>,
}

impl CpuLimitHandler {
    pub fn new(reader: Arc<CgroupReader>, metrics: Arc<Metrics>) -> Self {
        Self { reader, metrics }
    }
}

#[async_trait]
impl Handler for CpuLimitHandler {
    async fn handle(&self) -> Reply {
        match self.reader.read_cpu_limit() {
            Ok(limit) => {
                debug!("CPU limit: {}", limit);
                Reply::text(render_cpu_limit(limit))
            }
            Err(e) => read_failure(&self.metrics, "CPU limit", &e),
        }
    }

    fn name(&self) -> &'static str {
        "cpu_limit"
    }
}

/// `GET /memory` in limits mode.
pub struct MemoryLimitHandler {
    reader: Arc<CgroupReader>,
    metrics: Arc<Metrics>,
}

impl MemoryLimitHandler {
    pub fn new(reader: Arc<CgroupReader>, metrics: Arc<Metrics>) -> Self {
        Self { reader, metrics }
    }
}

#[async_trait]
impl Handler for MemoryLimitHandler {
    async fn handle(&self) -> Reply {
        match self.reader.read_memory_limit() {
            Ok(bytes) => {
                debug!("Memory limit: {}", memory_limit_display(bytes));
                Reply::text(render_memory_limit(bytes))
            }
            Err(e) => read_failure(&self.metrics, "memory limit", &e),
        }
    }

    fn name(&self) -> &'static str {
        "memory_limit"
    }
}
