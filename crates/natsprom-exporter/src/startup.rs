//! Process lifecycle: validate → probe → bind → serve.
//!
//! Every fatal error surfaces before the poller is spawned, so a failed start
//! never leaves a listener or a background task behind.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use natsprom_core::error::{NatsPromError, Result};

use crate::app_state::AppState;
use crate::config::ExporterConfig;
use crate::obs::ExporterMetrics;
use crate::poller::{shutdown_requested, Poller};
use crate::router::build_router;
use crate::upstream::VarzClient;

/// A started but not yet serving exporter.
pub struct Exporter {
    listener: TcpListener,
    state: AppState,
    poller: Poller,
}

impl Exporter {
    /// Validate the config, probe upstream once, then bind the listener.
    pub async fn bootstrap(cfg: ExporterConfig) -> Result<Self> {
        cfg.validate()?;
        let listen = cfg.listen_socket_addr()?;

        let client = VarzClient::new(&cfg)?;
        client.probe().await?;
        info!(url = %client.url(), "upstream probe ok");

        let listener = TcpListener::bind(listen)
            .await
            .map_err(|e| NatsPromError::Bind(format!("{listen}: {e}")))?;

        let metrics = Arc::new(ExporterMetrics::new());
        let poller = Poller::new(Arc::new(client), metrics.clone(), cfg.interval());
        let state = AppState::new(cfg, metrics);

        Ok(Self {
            listener,
            state,
            poller,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| NatsPromError::Internal(format!("local_addr: {e}")))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the poller and the HTTP server until `shutdown` fires.
    pub async fn serve(self, shutdown: watch::Receiver<bool>) -> Result<()> {
        let Self {
            listener,
            state,
            poller,
        } = self;

        let local = listener
            .local_addr()
            .map_err(|e| NatsPromError::Internal(format!("local_addr: {e}")))?;
        info!(
            listen = %local,
            upstream = %state.cfg().varz_url(),
            interval_secs = state.cfg().interval().as_secs(),
            "natsprom exporter serving"
        );

        let poll_task = poller.spawn(shutdown.clone());

        let app = build_router(state.clone());
        let mut server_shutdown = shutdown;
        let drain_state = state.clone();
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_requested(&mut server_shutdown).await;
                drain_state.set_draining();
                info!("shutdown requested, draining");
            })
            .await;

        // The server can only return early on an I/O error; stop the poller
        // in that case too.
        poll_task.abort();
        let _ = poll_task.await;

        served.map_err(|e| NatsPromError::Internal(format!("server failed: {e}")))
    }
}

/// Bootstrap and serve in one call.
pub async fn run(cfg: ExporterConfig, shutdown: watch::Receiver<bool>) -> Result<()> {
    Exporter::bootstrap(cfg).await?.serve(shutdown).await
}
