//! Upstream side: where snapshots come from.

pub mod client;

use async_trait::async_trait;

use natsprom_core::{Result, VarzSnapshot};

pub use client::VarzClient;

/// Anything that can produce one `/varz` snapshot per call.
///
/// Implementations must not retry; a failed call is reported as-is and the
/// poller tries again on its next tick.
#[async_trait]
pub trait VarzSource: Send + Sync {
    async fn fetch(&self) -> Result<VarzSnapshot>;
}
