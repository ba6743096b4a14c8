//! HTTP client for the NATS monitoring endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use natsprom_core::error::{NatsPromError, Result};
use natsprom_core::varz::{decode_varz, VarzSnapshot};

use crate::config::ExporterConfig;

use super::VarzSource;

/// `GET /varz` against one NATS server.
#[derive(Debug, Clone)]
pub struct VarzClient {
    client: Client,
    url: String,
}

impl VarzClient {
    /// Build a client for `cfg`. The whole-request timeout equals the poll
    /// interval.
    pub fn new(cfg: &ExporterConfig) -> Result<Self> {
        Self::with_timeout(cfg.varz_url(), cfg.interval())
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NatsPromError::Internal(format!("http client build failed: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One-time startup check: the endpoint must answer 200.
    /// The body is discarded.
    pub async fn probe(&self) -> Result<()> {
        self.get()
            .await
            .map(|_| ())
            .map_err(|e| NatsPromError::Probe(format!("GET {}: {e}", self.url)))
    }

    /// Send the request and insist on a 200.
    async fn get(&self) -> Result<reqwest::Response> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| NatsPromError::Network(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(NatsPromError::Status(status.as_u16()));
        }
        Ok(resp)
    }
}

#[async_trait]
impl VarzSource for VarzClient {
    async fn fetch(&self) -> Result<VarzSnapshot> {
        let resp = self.get().await?;
        // Body read failures (including the timeout firing mid-body) count as
        // network errors, not decode errors.
        let body = resp
            .bytes()
            .await
            .map_err(|e| NatsPromError::Network(e.to_string()))?;
        decode_varz(&body)
    }
}
