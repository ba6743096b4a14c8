//! NATS `/varz` monitoring body (JSON).
//!
//! Only the fields the exporter publishes are modelled. The server reports
//! dozens more (`cpu`, `mem`, `uptime`, ...); those are ignored. Missing
//! fields and `null` values decode as zero so an older or trimmed-down server
//! still yields a snapshot.

use serde::{Deserialize, Deserializer};

use crate::error::{NatsPromError, Result};

/// One decoded reading of the upstream status endpoint.
///
/// All values are carried as `f64`, the way the exposition format stores them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VarzSnapshot {
    /// Bytes received, cumulative since server start.
    #[serde(deserialize_with = "null_as_zero")]
    pub in_bytes: f64,
    /// Bytes sent, cumulative since server start.
    #[serde(deserialize_with = "null_as_zero")]
    pub out_bytes: f64,
    /// Messages received, cumulative since server start.
    #[serde(deserialize_with = "null_as_zero")]
    pub in_msgs: f64,
    /// Messages sent, cumulative since server start.
    #[serde(deserialize_with = "null_as_zero")]
    pub out_msgs: f64,
    /// Current slow consumer count.
    #[serde(deserialize_with = "null_as_zero")]
    pub slow_consumers: f64,
    /// Current client connections.
    #[serde(deserialize_with = "null_as_zero")]
    pub connections: f64,
    /// Configured connection limit. Decoded but not exported.
    #[serde(deserialize_with = "null_as_zero")]
    pub max_connections: f64,
}

/// `null` leaves the field at zero instead of failing the whole body.
fn null_as_zero<'de, D>(de: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(de)?.unwrap_or_default())
}

/// Decode a `/varz` response body.
pub fn decode_varz(body: &[u8]) -> Result<VarzSnapshot> {
    serde_json::from_slice(body).map_err(|e| NatsPromError::Decode(e.to_string()))
}
