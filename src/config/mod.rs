//! Configuration module for resource_probe.
//!
//! This module provides centralized configuration loading from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use resource_probe::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Listen address: {}", config.server.listen_addr);
//! println!("Mode: {}", config.reporter.mode);
//! ```

mod error;
mod logging;
mod parse;
mod reporter;
mod server;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use reporter::{ReporterConfig, ReporterMode};
pub use server::{ServerConfig, DEFAULT_PORT};

use crate::probe::ProbeJob;

/// Complete application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Reporter configuration.
    pub reporter: ReporterConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            reporter: ReporterConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Listen: {}", self.server.listen_addr);
        info!("  Mode: {}", self.reporter.mode);

        match self.reporter.mode {
            ReporterMode::Limits => {
                info!("  Cgroup root: {}", self.reporter.cgroup_root.display());
            }
            ReporterMode::Probe => {
                let job = ProbeJob::default();
                info!(
                    "  Probe: {} workers x {}s",
                    job.workers,
                    job.duration.as_secs()
                );
            }
        }

        if self.server.access_log {
            info!("  Access log: enabled");
        }
    }
}
