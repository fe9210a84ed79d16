//! Observability: Prometheus metrics.
//!
//! Exposed on `GET /metrics` in the Prometheus text format.

mod metrics;

pub use metrics::{Metrics, UNMATCHED_ROUTE};
