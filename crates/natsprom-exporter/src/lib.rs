//! natsprom exporter library entry.
//!
//! Wires the upstream client, the poller, the metric registry and the HTTP
//! endpoints. Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod poller;
pub mod reconcile;
pub mod router;
pub mod startup;
pub mod upstream;
