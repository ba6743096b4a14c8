//! Lightweight in-process metrics.
//!
//! Values are stored as atomics and rendered by the `/metrics` handler in the
//! Prometheus text exposition format.

pub mod metrics;

pub use metrics::{CounterVec, Direction, ExporterMetrics, Gauge};
