//! Route handlers for `/cpu` and `/memory`.
//!
//! Two variants share the same routes:
//!
//! - **limits**: cgroup v1 ceilings, read fresh on every request
//! - **probe**: a fixed-duration CPU capacity probe and current memory usage
//!
//! `/health` and `/metrics` are registered in both modes.

mod limits;
mod load;

use std::sync::Arc;

use crate::config::{ReporterConfig, ReporterMode};
use crate::observability::Metrics;
use crate::probe::ProbeJob;
use crate::server::{HealthHandler, MetricsHandler, Router};
use crate::system::CgroupReader;

pub use limits::{render_cpu_limit, render_memory_limit, CpuLimitHandler, MemoryLimitHandler};
pub use load::{render_cpu_usage, render_memory_usage, CpuUsageHandler, MemoryUsageHandler};

pub const CPU_ROUTE: &str = "/cpu";
pub const MEMORY_ROUTE: &str = "/memory";
pub const HEALTH_ROUTE: &str = "/health";
pub const METRICS_ROUTE: &str = "/metrics";

/// Build the router for the configured mode with the default probe job.
pub fn build_router(config: &ReporterConfig, metrics: Arc<Metrics>) -> Router {
    build_router_with_job(config, ProbeJob::default(), metrics)
}

/// Build the router, running `job` on each probe-mode `/cpu` request.
pub fn build_router_with_job(
    config: &ReporterConfig,
    job: ProbeJob,
    metrics: Arc<Metrics>,
) -> Router {
    let router = match config.mode {
        ReporterMode::Limits => {
            let reader = Arc::new(CgroupReader::new(&config.cgroup_root));
            Router::new()
                .route(
                    CPU_ROUTE,
                    CpuLimitHandler::new(Arc::clone(&reader), Arc::clone(&metrics)),
                )
                .route(
                    MEMORY_ROUTE,
                    MemoryLimitHandler::new(reader, Arc::clone(&metrics)),
                )
        }
        ReporterMode::Probe => Router::new()
            .route(CPU_ROUTE, CpuUsageHandler::new(job, Arc::clone(&metrics)))
            .route(MEMORY_ROUTE, MemoryUsageHandler),
    };

    router
        .route(HEALTH_ROUTE, HealthHandler::new(config.mode))
        .route(METRICS_ROUTE, MetricsHandler::new(metrics))
}
