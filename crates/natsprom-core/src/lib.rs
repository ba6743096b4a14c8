//! natsprom core: the `/varz` snapshot schema and the error surface shared by
//! the exporter.
//!
//! This crate carries no HTTP or runtime dependencies; it only knows how to
//! turn a NATS monitoring body into a typed snapshot.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! must surface as `NatsPromError`/`Result` so a malformed upstream body never
//! brings the exporter down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod varz;

/// Shared result type.
pub use error::{ErrorKind, NatsPromError, Result};
pub use varz::{decode_varz, VarzSnapshot};
