//! resource_probe - container resource reporter over HTTP.
//!
//! Answers two questions about the environment a process runs in, on
//! `GET /cpu` and `GET /memory`:
//!
//! - **limits** mode reports the cgroup v1 ceilings: the CFS quota as a
//!   core allowance and the memory limit in bytes.
//! - **probe** mode measures instead: a fixed-duration busy loop on one
//!   thread per CPU gives an operations-per-second estimate, and memory
//!   usage is reported in MB for this process and the host.
//!
//! `GET /health` and `GET /metrics` (Prometheus) are served in both modes.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use resource_probe::{config::Config, observability::Metrics, reporter, server::Server};
//!
//! let config = Config::from_env()?;
//! let metrics = Arc::new(Metrics::new()?);
//! let router = reporter::build_router(&config.reporter, Arc::clone(&metrics));
//! let server = Server::bind(config.server.listen_addr, router, metrics).await?;
//! server.run().await?;
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (8 chars) with optional "-dirty" suffix
pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

/// Full version string: "0.1.0 (abc12345)" or "0.1.0 (abc12345-dirty)"
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_VERSION"), ")");

pub mod config;
pub mod format;
pub mod logging;
pub mod observability;
pub mod probe;
pub mod reporter;
pub mod server;
pub mod system;

// Re-exports for convenience
pub use config::Config;
pub use probe::{probe, ProbeError, ProbeJob, ProbeResult};
pub use server::{Router, Server, ServerError};
pub use system::{CgroupReader, CpuLimit, ResourceError};
