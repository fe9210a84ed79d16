//! Per-worker computations for the capacity probe.

use std::hint::black_box;
use std::time::{Duration, Instant};

/// Work executed by a single probe worker.
///
/// Implementations run until `duration` has elapsed since their own start
/// and return the number of operations completed. The production workload is
/// [`BusyLoop`]; tests substitute deterministic counters.
pub trait Workload: Send + Sync + 'static {
    /// Run on worker `worker` for `duration` and return the operation count.
    fn run(&self, worker: usize, duration: Duration) -> u64;
}

/// Tight increment loop bounded by wall-clock time.
///
/// One operation is one counter increment plus one clock read. The count is
/// sensitive to scheduler contention, frequency scaling and background load,
/// so it is a rough capacity indicator and not a calibrated benchmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusyLoop;

impl Workload for BusyLoop {
    fn run(&self, _worker: usize, duration: Duration) -> u64 {
        let start = Instant::now();
        let mut count: u64 = 0;

        while start.elapsed() < duration {
            count = black_box(count.wrapping_add(1));
        }

        count
    }
}

impl<F> Workload for F
where
    F: Fn(usize, Duration) -> u64 + Send + Sync + 'static,
{
    fn run(&self, worker: usize, duration: Duration) -> u64 {
        self(worker, duration)
    }
}
