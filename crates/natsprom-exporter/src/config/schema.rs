use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use serde::Deserialize;
use natsprom_core::error::{NatsPromError, Result};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    /// Address the `/metrics` endpoint listens on.
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// `host:port` of the NATS monitoring endpoint.
    #[serde(default = "default_nats_address")]
    pub nats_address: String,

    /// Seconds between polls. Also the request timeout.
    #[serde(default = "default_consume_time_secs")]
    pub consume_time_secs: i64,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            nats_address: default_nats_address(),
            consume_time_secs: default_consume_time_secs(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.consume_time_secs < 1 {
            return Err(NatsPromError::Config(
                "consume time should be >0".into(),
            ));
        }
        if self.nats_address.trim().is_empty() {
            return Err(NatsPromError::Config("nats.address must not be empty".into()));
        }
        if self.nats_address.contains("://") {
            return Err(NatsPromError::Config(
                "nats.address must be host:port, without a scheme".into(),
            ));
        }
        if self.listen_address.trim().is_empty() {
            return Err(NatsPromError::Config(
                "web.listen-address must not be empty".into(),
            ));
        }

        self.listen_socket_addr()?; // Verify the listener address resolves

        Ok(())
    }

    /// Poll interval; callers must have validated the config first.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.consume_time_secs.max(1) as u64)
    }

    /// Resolve the listen address. A bare `:port` binds all interfaces.
    pub fn listen_socket_addr(&self) -> Result<SocketAddr> {
        let addr = with_default_host(self.listen_address.trim(), "0.0.0.0");
        addr.to_socket_addrs()
            .map_err(|e| NatsPromError::Config(format!("web.listen-address {addr}: {e}")))?
            .next()
            .ok_or_else(|| {
                NatsPromError::Config(format!("web.listen-address {addr} resolved to nothing"))
            })
    }

    /// `host:port` used for upstream requests. A bare `:port` means loopback.
    pub fn upstream_authority(&self) -> String {
        with_default_host(self.nats_address.trim().trim_end_matches('/'), "127.0.0.1")
    }

    pub fn varz_url(&self) -> String {
        format!("http://{}/varz", self.upstream_authority())
    }
}

fn with_default_host(addr: &str, host: &str) -> String {
    if addr.starts_with(':') {
        format!("{host}{addr}")
    } else {
        addr.to_string()
    }
}

fn default_listen_address() -> String {
    ":9104".into()
}
fn default_nats_address() -> String {
    ":8043".into()
}
fn default_consume_time_secs() -> i64 {
    10
}
