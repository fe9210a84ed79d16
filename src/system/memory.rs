//! Process and host memory measurement.

use std::fs;

use tracing::trace;

/// Host-wide memory figures from `/proc/meminfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemMemory {
    /// Total memory in bytes
    pub total_bytes: u64,
    /// Free memory in bytes (`MemFree`, not counting reclaimable cache)
    pub free_bytes: u64,
}

/// Memory snapshot reported by the probe variant of `/memory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryUsage {
    /// Resident memory of this process in bytes
    pub process_bytes: u64,
    /// Host memory, if `/proc/meminfo` is readable
    pub system: Option<SystemMemory>,
}

impl MemoryUsage {
    /// Take a fresh snapshot.
    pub fn read() -> Self {
        Self {
            process_bytes: read_process_memory(),
            system: read_system_memory(),
        }
    }
}

/// Read resident memory of the current process.
///
/// Uses `/proc/self/statm` (resident pages × page size) and falls back to
/// the peak RSS reported by `getrusage` where procfs is unavailable.
pub fn read_process_memory() -> u64 {
    if let Some(bytes) = fs::read_to_string("/proc/self/statm")
        .ok()
        .and_then(|content| parse_statm_resident(&content, page_size()))
    {
        trace!("process resident memory (statm): {} bytes", bytes);
        return bytes;
    }

    let bytes = peak_rss_bytes();
    trace!("process resident memory (getrusage peak): {} bytes", bytes);
    bytes
}

/// Read host memory totals, `None` if `/proc/meminfo` is missing or incomplete.
pub fn read_system_memory() -> Option<SystemMemory> {
    fs::read_to_string("/proc/meminfo")
        .ok()
        .and_then(|content| parse_meminfo(&content))
}

/// Parse `MemTotal` and `MemFree` out of `/proc/meminfo` content.
pub fn parse_meminfo(content: &str) -> Option<SystemMemory> {
    let mut total = None;
    let mut free = None;

    for line in content.lines() {
        if line.starts_with("MemTotal:") {
            total = parse_meminfo_kb(line);
        } else if line.starts_with("MemFree:") {
            free = parse_meminfo_kb(line);
        }
    }

    Some(SystemMemory {
        total_bytes: total?.saturating_mul(1024),
        free_bytes: free?.saturating_mul(1024),
    })
}

/// Parse a line like "MemTotal:       16384000 kB" and return the value in KB
fn parse_meminfo_kb(line: &str) -> Option<u64> {
    line.split_whitespace().nth(1).and_then(|s| s.parse().ok())
}

/// Second field of `/proc/self/statm` is the resident page count.
fn parse_statm_resident(content: &str, page_size: u64) -> Option<u64> {
    content
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .map(|pages| pages.saturating_mul(page_size))
}

fn page_size() -> u64 {
    // SAFETY: sysconf has no preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as u64
    } else {
        4096
    }
}

fn peak_rss_bytes() -> u64 {
    // SAFETY: rusage is plain data; getrusage only writes into it.
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };
    if rc != 0 {
        return 0;
    }

    let max_rss = usage.ru_maxrss.max(0) as u64;
    // Linux reports kilobytes, macOS bytes.
    if cfg!(target_os = "macos") {
        max_rss
    } else {
        max_rss.saturating_mul(1024)
    }
}
