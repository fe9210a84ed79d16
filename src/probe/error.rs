//! Capacity probe error types.

use std::fmt;
use std::time::Duration;

/// Errors that can occur while running a capacity probe.
#[derive(Debug)]
pub enum ProbeError {
    /// Worker count must be at least one.
    InvalidWorkerCount(usize),

    /// Probe duration must be positive.
    InvalidDuration(Duration),

    /// The OS refused to start a worker thread.
    Spawn {
        /// Index of the worker that failed to start.
        worker: usize,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A worker thread panicked before reporting.
    WorkerPanic {
        /// Index of the panicked worker.
        worker: usize,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// Fewer results than workers arrived on the collection channel.
    ChannelClosed {
        /// Number of workers started.
        expected: usize,
        /// Number of results received.
        received: usize,
    },

    /// The blocking task running the probe was cancelled or panicked.
    Task(String),
}

impl ProbeError {
    /// Check if the error comes from invalid job parameters.
    pub fn is_invalid_job(&self) -> bool {
        matches!(
            self,
            ProbeError::InvalidWorkerCount(_) | ProbeError::InvalidDuration(_)
        )
    }

    /// Get the error message for logging.
    pub fn message(&self) -> &'static str {
        match self {
            ProbeError::InvalidWorkerCount(_) => "Invalid worker count",
            ProbeError::InvalidDuration(_) => "Invalid duration",
            ProbeError::Spawn { .. } => "Worker spawn failed",
            ProbeError::WorkerPanic { .. } => "Worker panic",
            ProbeError::ChannelClosed { .. } => "Channel closed",
            ProbeError::Task(_) => "Probe task failed",
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::InvalidWorkerCount(count) => {
                write!(f, "worker count must be at least 1, got {}", count)
            }
            ProbeError::InvalidDuration(duration) => {
                write!(f, "probe duration must be positive, got {:?}", duration)
            }
            ProbeError::Spawn { worker, source } => {
                write!(f, "failed to spawn probe worker {}: {}", worker, source)
            }
            ProbeError::WorkerPanic { worker, message } => {
                write!(f, "probe worker {} panicked: {}", worker, message)
            }
            ProbeError::ChannelClosed { expected, received } => {
                write!(
                    f,
                    "result channel closed after {}/{} worker reports",
                    received, expected
                )
            }
            ProbeError::Task(msg) => {
                write!(f, "probe task failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}
