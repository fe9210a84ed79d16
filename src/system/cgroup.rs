//! Cgroup v1 limit reading.
//!
//! CPU allowance comes from the CFS scheduler quota and period
//! (`cpu.cfs_quota_us / cpu.cfs_period_us`), the memory ceiling from
//! `memory.limit_in_bytes`. Every call reads the files again; nothing is
//! cached.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use super::error::ResourceError;

/// Default mount point of the cgroup v1 hierarchy.
pub const DEFAULT_CGROUP_ROOT: &str = "/sys/fs/cgroup";

const CPU_QUOTA_FILE: &str = "cpu/cpu.cfs_quota_us";
const CPU_PERIOD_FILE: &str = "cpu/cpu.cfs_period_us";
const MEMORY_LIMIT_FILE: &str = "memory/memory.limit_in_bytes";

/// Quota value the kernel writes when no CPU limit is set.
const UNLIMITED_QUOTA: f64 = -1.0;

/// Effective CPU allowance of the cgroup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CpuLimit {
    /// Quota is `-1`: the group may use every CPU.
    Unlimited,
    /// Quota divided by period, in cores (e.g. 0.5 = half a core).
    Cores(f64),
}

impl CpuLimit {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, CpuLimit::Unlimited)
    }

    /// Core allowance, `None` when unlimited.
    pub fn cores(&self) -> Option<f64> {
        match self {
            CpuLimit::Cores(c) => Some(*c),
            CpuLimit::Unlimited => None,
        }
    }
}

impl fmt::Display for CpuLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuLimit::Unlimited => write!(f, "unlimited"),
            CpuLimit::Cores(c) => write!(f, "{:.2} cores", c),
        }
    }
}

/// Reads limits from a cgroup v1 hierarchy rooted at a directory.
#[derive(Debug, Clone)]
pub struct CgroupReader {
    root: PathBuf,
}

impl CgroupReader {
    /// Create a reader for the hierarchy mounted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the CPU allowance.
    ///
    /// Both quota and period must be readable and numeric, even when the
    /// quota turns out to be the unlimited sentinel.
    pub fn read_cpu_limit(&self) -> Result<CpuLimit, ResourceError> {
        let quota = self.read_f64(CPU_QUOTA_FILE)?;
        let period = self.read_f64(CPU_PERIOD_FILE)?;

        if quota == UNLIMITED_QUOTA {
            trace!("cgroup v1 cpu quota: unlimited");
            return Ok(CpuLimit::Unlimited);
        }

        if period <= 0.0 {
            return Err(ResourceError::Parse {
                path: self.root.join(CPU_PERIOD_FILE),
                value: period.to_string(),
                message: "period must be positive".into(),
            });
        }

        let cores = quota / period;
        trace!("cgroup v1 cpu quota: {}/{} = {:.2} CPUs", quota, period, cores);
        Ok(CpuLimit::Cores(cores))
    }

    /// Read the memory ceiling in bytes.
    ///
    /// The kernel reports "no limit" as a huge page-aligned number; it is
    /// returned as-is.
    pub fn read_memory_limit(&self) -> Result<u64, ResourceError> {
        let (path, raw) = self.read_trimmed(MEMORY_LIMIT_FILE)?;
        let value = raw.parse::<u64>().map_err(|e| ResourceError::Parse {
            path,
            value: raw.clone(),
            message: e.to_string(),
        })?;
        trace!("cgroup v1 memory.limit_in_bytes: {} bytes", value);
        Ok(value)
    }

    fn read_f64(&self, relative: &str) -> Result<f64, ResourceError> {
        let (path, raw) = self.read_trimmed(relative)?;
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(ResourceError::Parse {
                path,
                value: raw,
                message: "value is not finite".into(),
            }),
            Err(e) => Err(ResourceError::Parse {
                path,
                message: e.to_string(),
                value: raw,
            }),
        }
    }

    fn read_trimmed(&self, relative: &str) -> Result<(PathBuf, String), ResourceError> {
        let path = self.root.join(relative);
        match fs::read_to_string(&path) {
            Ok(content) => Ok((path, content.trim().to_string())),
            Err(source) => Err(ResourceError::Io { path, source }),
        }
    }
}

impl Default for CgroupReader {
    fn default() -> Self {
        Self::new(DEFAULT_CGROUP_ROOT)
    }
}

/// Get a byte count in human-readable format.
pub fn memory_limit_display(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.1} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else {
        format!("{} bytes", bytes)
    }
}
