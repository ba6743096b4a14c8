//! Shared error type across natsprom crates.

use thiserror::Error;

/// Stable error classification (used in log fields and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid configuration.
    Config,
    /// Upstream unreachable or unhealthy at startup.
    Probe,
    /// Exposition listener could not be bound.
    Bind,
    /// Connection refused, DNS failure, timeout.
    Network,
    /// Upstream answered with a non-200 status.
    Status,
    /// Upstream body is not the expected JSON.
    Decode,
    /// Internal error.
    Internal,
}

impl ErrorKind {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "CONFIG",
            ErrorKind::Probe => "PROBE",
            ErrorKind::Bind => "BIND",
            ErrorKind::Network => "NETWORK",
            ErrorKind::Status => "STATUS",
            ErrorKind::Decode => "DECODE",
            ErrorKind::Internal => "INTERNAL",
        }
    }

    /// Fatal kinds abort the process before any background work starts.
    /// The rest are confined to a single poll cycle.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            ErrorKind::Config | ErrorKind::Probe | ErrorKind::Bind | ErrorKind::Internal
        )
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, NatsPromError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum NatsPromError {
    #[error("config: {0}")]
    Config(String),
    #[error("startup probe failed: {0}")]
    Probe(String),
    #[error("bind failed: {0}")]
    Bind(String),
    #[error("network: {0}")]
    Network(String),
    #[error("expected statuscode 200 got {0}")]
    Status(u16),
    #[error("could not decode nats-info: {0}")]
    Decode(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl NatsPromError {
    /// Map error to its stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NatsPromError::Config(_) => ErrorKind::Config,
            NatsPromError::Probe(_) => ErrorKind::Probe,
            NatsPromError::Bind(_) => ErrorKind::Bind,
            NatsPromError::Network(_) => ErrorKind::Network,
            NatsPromError::Status(_) => ErrorKind::Status,
            NatsPromError::Decode(_) => ErrorKind::Decode,
            NatsPromError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.kind().is_fatal()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cycle_errors_are_recoverable() {
        assert!(!NatsPromError::Network("refused".into()).is_fatal());
        assert!(!NatsPromError::Status(503).is_fatal());
        assert!(!NatsPromError::Decode("eof".into()).is_fatal());
    }

    #[test]
    fn startup_errors_are_fatal() {
        assert!(NatsPromError::Config("bad".into()).is_fatal());
        assert!(NatsPromError::Probe("503".into()).is_fatal());
        assert!(NatsPromError::Bind("in use".into()).is_fatal());
    }

    #[test]
    fn status_message_names_code() {
        assert_eq!(
            NatsPromError::Status(503).to_string(),
            "expected statuscode 200 got 503"
        );
        assert_eq!(NatsPromError::Status(503).kind().as_str(), "STATUS");
    }
}
