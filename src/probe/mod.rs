//! CPU capacity probe.
//!
//! Estimates achievable throughput by running a fixed-duration busy loop on
//! several OS threads at once and summing what they managed to do.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        probe()                             │
//! ├────────────────────────────────────────────────────────────┤
//! │  ┌─────────┐    ┌─────────┐    ┌─────────┐                 │
//! │  │ Worker0 │    │ Worker1 │    │ WorkerN │  (own counter)  │
//! │  └────┬────┘    └────┬────┘    └────┬────┘                 │
//! │       │ (id, count)  │              │                      │
//! │       └──────────────┴──────────────┘                      │
//! │                      │                                     │
//! │              ┌───────▼───────┐                             │
//! │              │  mpsc channel │  (bounded, one slot/worker) │
//! │              └───────┬───────┘                             │
//! │                      │  join all workers, then drain       │
//! │              ┌───────▼───────┐                             │
//! │              │  ProbeResult  │  sum / duration             │
//! │              └───────────────┘                             │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each call is an independent job. Concurrent probes do not share state but
//! do compete for the same CPUs, so they lower each other's estimates.

mod error;
mod workload;

pub use error::ProbeError;
pub use workload::{BusyLoop, Workload};

use std::collections::BTreeMap;
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Default probe duration.
pub const DEFAULT_PROBE_DURATION: Duration = Duration::from_secs(5);

/// Parameters of a single probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeJob {
    /// How long every worker keeps counting.
    pub duration: Duration,
    /// Number of concurrent workers.
    pub workers: usize,
}

impl ProbeJob {
    pub fn new(duration: Duration, workers: usize) -> Self {
        Self { duration, workers }
    }

    fn validate(&self) -> Result<(), ProbeError> {
        if self.workers == 0 {
            return Err(ProbeError::InvalidWorkerCount(self.workers));
        }
        if self.duration.is_zero() {
            return Err(ProbeError::InvalidDuration(self.duration));
        }
        Ok(())
    }
}

impl Default for ProbeJob {
    /// Five seconds, one worker per available CPU.
    fn default() -> Self {
        Self {
            duration: DEFAULT_PROBE_DURATION,
            workers: num_cpus::get(),
        }
    }
}

/// Per-worker operation counts of a finished probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    counts: BTreeMap<usize, u64>,
    duration: Duration,
}

impl ProbeResult {
    /// Build a result from already collected counts.
    pub fn new(counts: BTreeMap<usize, u64>, duration: Duration) -> Self {
        Self { counts, duration }
    }

    /// Number of workers that reported.
    pub fn workers(&self) -> usize {
        self.counts.len()
    }

    /// Operation count per worker index.
    pub fn counts(&self) -> &BTreeMap<usize, u64> {
        &self.counts
    }

    /// Configured probe duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Sum of all worker counts.
    pub fn total_operations(&self) -> u64 {
        self.counts
            .values()
            .fold(0u64, |acc, &count| acc.saturating_add(count))
    }

    /// Aggregate throughput in operations per second.
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.total_operations() as f64 / secs
        } else {
            0.0
        }
    }
}

/// Run a probe with the production [`BusyLoop`] workload.
///
/// Blocks the calling thread for roughly `job.duration`.
pub fn probe(job: &ProbeJob) -> Result<ProbeResult, ProbeError> {
    probe_with(job, Arc::new(BusyLoop))
}

/// Run a probe with a custom workload.
///
/// Spawns `job.workers` threads, waits for every one of them to finish and
/// only then reads their reports. No partial sums are ever observed.
pub fn probe_with<W: Workload>(
    job: &ProbeJob,
    workload: Arc<W>,
) -> Result<ProbeResult, ProbeError> {
    job.validate()?;

    let started = Instant::now();
    debug!(
        workers = job.workers,
        duration_ms = job.duration.as_millis() as u64,
        "capacity probe started"
    );

    let (result_tx, result_rx) = mpsc::sync_channel::<(usize, u64)>(job.workers);
    let mut handles: Vec<(usize, JoinHandle<()>)> = Vec::with_capacity(job.workers);

    for id in 0..job.workers {
        let tx = result_tx.clone();
        let workload = Arc::clone(&workload);
        let duration = job.duration;

        let spawned = thread::Builder::new()
            .name(format!("probe-worker-{}", id))
            .spawn(move || {
                let count = workload.run(id, duration);
                // Receiver outlives every worker; send only fails if the caller is gone.
                let _ = tx.send((id, count));
            });

        match spawned {
            Ok(handle) => handles.push((id, handle)),
            Err(source) => {
                // Never abandon workers that already started.
                drop(result_tx);
                join_all(handles);
                return Err(ProbeError::Spawn { worker: id, source });
            }
        }
    }
    drop(result_tx);

    if let Some(err) = join_all(handles) {
        return Err(err);
    }

    let counts: BTreeMap<usize, u64> = result_rx.try_iter().collect();
    if counts.len() != job.workers {
        return Err(ProbeError::ChannelClosed {
            expected: job.workers,
            received: counts.len(),
        });
    }

    let result = ProbeResult::new(counts, job.duration);
    debug!(
        workers = result.workers(),
        total_ops = result.total_operations(),
        ops_per_sec = result.throughput(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "capacity probe finished"
    );

    Ok(result)
}

/// Run [`probe`] on the blocking thread pool so async callers stay responsive.
pub async fn probe_blocking(job: ProbeJob) -> Result<ProbeResult, ProbeError> {
    tokio::task::spawn_blocking(move || probe(&job))
        .await
        .map_err(|e| ProbeError::Task(e.to_string()))?
}

/// Join every worker, returning the first panic seen.
fn join_all(handles: Vec<(usize, JoinHandle<()>)>) -> Option<ProbeError> {
    let mut first_panic = None;

    for (worker, handle) in handles {
        if let Err(payload) = handle.join() {
            let message = panic_message(payload.as_ref());
            warn!(worker, panic = %message, "probe worker panicked");
            if first_panic.is_none() {
                first_panic = Some(ProbeError::WorkerPanic { worker, message });
            }
        }
    }

    first_panic
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fixed_counts(worker: usize, _duration: Duration) -> u64 {
        [100, 250, 4000, 7][worker % 4]
    }

    #[test]
    fn test_throughput_is_sum_over_duration() {
        let job = ProbeJob::new(Duration::from_secs(2), 4);
        let result = probe_with(&job, Arc::new(fixed_counts)).unwrap();

        assert_eq!(result.workers(), 4);
        assert_eq!(result.total_operations(), 100 + 250 + 4000 + 7);
        assert_eq!(result.throughput(), 4357.0 / 2.0);
        assert_eq!(result.counts().get(&2), Some(&4000));
    }

    #[test]
    fn test_every_worker_reports_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let workload = move |worker: usize, _d: Duration| {
            seen.fetch_add(1, Ordering::SeqCst);
            worker as u64
        };

        let job = ProbeJob::new(Duration::from_millis(1), 16);
        let result = probe_with(&job, Arc::new(workload)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 16);
        let ids: HashSet<usize> = result.counts().keys().copied().collect();
        assert_eq!(ids, (0..16).collect::<HashSet<_>>());
        assert_eq!(result.total_operations(), (0..16u64).sum::<u64>());
    }

    #[test]
    fn test_rejects_zero_workers() {
        let job = ProbeJob::new(Duration::from_secs(1), 0);
        let err = probe(&job).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidWorkerCount(0)));
    }

    #[test]
    fn test_rejects_zero_duration() {
        let job = ProbeJob::new(Duration::ZERO, 2);
        let err = probe(&job).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidDuration(_)));
    }

    #[test]
    fn test_real_busy_loop_is_bounded() {
        let duration = Duration::from_millis(50);
        let job = ProbeJob::new(duration, 2);

        let start = Instant::now();
        let result = probe(&job).unwrap();
        let elapsed = start.elapsed();

        assert!(elapsed >= duration);
        assert!(elapsed < Duration::from_secs(2), "probe took {:?}", elapsed);
        assert_eq!(result.workers(), 2);
        assert!(result.throughput() >= 0.0);
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let workload = |worker: usize, _d: Duration| {
            if worker == 1 {
                panic!("boom");
            }
            1u64
        };

        let job = ProbeJob::new(Duration::from_millis(1), 3);
        let err = probe_with(&job, Arc::new(workload)).unwrap_err();

        match err {
            ProbeError::WorkerPanic { worker, message } => {
                assert_eq!(worker, 1);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_concurrent_probes_are_independent() {
        let job = ProbeJob::new(Duration::from_millis(30), 2);

        let a = thread::spawn(move || probe(&job));
        let b = thread::spawn(move || probe(&job));

        let a = a.join().unwrap().unwrap();
        let b = b.join().unwrap().unwrap();
        assert_eq!(a.workers(), 2);
        assert_eq!(b.workers(), 2);
    }

    #[tokio::test]
    async fn test_probe_blocking() {
        let job = ProbeJob::new(Duration::from_millis(10), 1);
        let result = probe_blocking(job).await.unwrap();
        assert_eq!(result.workers(), 1);
        assert_eq!(result.duration(), Duration::from_millis(10));
    }

    #[test]
    fn test_default_job() {
        let job = ProbeJob::default();
        assert_eq!(job.duration, Duration::from_secs(5));
        assert!(job.workers >= 1);
    }

    #[test]
    fn test_empty_result_throughput() {
        let result = ProbeResult::new(BTreeMap::new(), Duration::ZERO);
        assert_eq!(result.throughput(), 0.0);
        assert_eq!(result.total_operations(), 0);
    }
}
