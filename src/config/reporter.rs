//! Reporter configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::parse::env_or;
use super::ConfigError;
use crate::system::DEFAULT_CGROUP_ROOT;

/// Which measurements `/cpu` and `/memory` report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReporterMode {
    /// Cgroup v1 CPU quota and memory ceiling (default).
    #[default]
    Limits,
    /// Busy-loop throughput probe and process/host memory usage.
    Probe,
}

impl ReporterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReporterMode::Limits => "limits",
            ReporterMode::Probe => "probe",
        }
    }
}

impl fmt::Display for ReporterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReporterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "limits" | "limit" | "cgroup" => Ok(ReporterMode::Limits),
            "probe" | "usage" | "stress" => Ok(ReporterMode::Probe),
            other => Err(format!("expected 'limits' or 'probe', got '{}'", other)),
        }
    }
}

/// Reporter configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct ReporterConfig {
    /// Reporting variant served on `/cpu` and `/memory`.
    pub mode: ReporterMode,
    /// Mount point of the cgroup v1 hierarchy.
    pub cgroup_root: PathBuf,
}

impl ReporterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env_or("REPORTER_MODE", "limits");
        let mode = raw.parse::<ReporterMode>().map_err(|e| ConfigError::Invalid {
            key: "REPORTER_MODE".into(),
            message: e,
        })?;

        Ok(Self {
            mode,
            cgroup_root: PathBuf::from(env_or("CGROUP_ROOT", DEFAULT_CGROUP_ROOT)),
        })
    }
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            mode: ReporterMode::default(),
            cgroup_root: PathBuf::from(DEFAULT_CGROUP_ROOT),
        }
    }
}
