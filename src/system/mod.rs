//! System resource detection.
//!
//! Reads container limits from the cgroup v1 hierarchy and memory figures
//! from procfs.
//!
//! # Example
//!
//! ```rust,ignore
//! use resource_probe::system::{CgroupReader, CpuLimit};
//!
//! let reader = CgroupReader::default();
//! match reader.read_cpu_limit()? {
//!     CpuLimit::Unlimited => println!("no CPU limit"),
//!     CpuLimit::Cores(c) => println!("{:.2} cores", c),
//! }
//! ```

mod cgroup;
mod error;
mod memory;

pub use cgroup::{memory_limit_display, CgroupReader, CpuLimit, DEFAULT_CGROUP_ROOT};
pub use error::ResourceError;
pub use memory::{
    parse_meminfo, read_process_memory, read_system_memory, MemoryUsage, SystemMemory,
};
