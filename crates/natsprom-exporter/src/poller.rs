//! Background poll loop.
//!
//! Idle → (interval elapses) → Polling → fetch → reconcile → Idle.
//! A failed fetch is logged and the cycle is dropped; metric state is only
//! touched after a snapshot has been fully decoded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use natsprom_core::error::ErrorKind;

use crate::obs::ExporterMetrics;
use crate::reconcile::reconcile;
use crate::upstream::VarzSource;

/// Result of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Reconciled,
    Skipped(ErrorKind),
}

pub struct Poller {
    source: Arc<dyn VarzSource>,
    metrics: Arc<ExporterMetrics>,
    interval: Duration,
}

impl Poller {
    pub fn new(
        source: Arc<dyn VarzSource>,
        metrics: Arc<ExporterMetrics>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            metrics,
            interval,
        }
    }

    /// One fetch + reconcile attempt. Never fails; errors end the cycle.
    pub async fn run_cycle(&self) -> CycleOutcome {
        match self.source.fetch().await {
            Ok(snap) => {
                reconcile(&self.metrics, &snap);
                debug!(
                    in_bytes = snap.in_bytes,
                    out_bytes = snap.out_bytes,
                    in_msgs = snap.in_msgs,
                    out_msgs = snap.out_msgs,
                    connections = snap.connections,
                    slow_consumers = snap.slow_consumers,
                    "poll cycle reconciled"
                );
                CycleOutcome::Reconciled
            }
            Err(e) => {
                warn!(kind = e.kind().as_str(), error = %e, "poll cycle failed");
                CycleOutcome::Skipped(e.kind())
            }
        }
    }

    /// Poll until `shutdown` turns true (or its sender is dropped).
    ///
    /// Sleeps a full interval before the first cycle. Shutdown also cancels a
    /// fetch in flight; reconcile is synchronous so it is never interrupted
    /// halfway.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs_f64(), "poller started");

        loop {
            tokio::select! {
                _ = async {
                    tokio::time::sleep(self.interval).await;
                    self.run_cycle().await
                } => {}
                _ = shutdown_requested(&mut shutdown) => {
                    debug!("poller shutting down");
                    break;
                }
            }
        }

        info!("poller stopped");
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

/// Resolves once shutdown is requested. A dropped sender counts as a request.
pub(crate) async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}
