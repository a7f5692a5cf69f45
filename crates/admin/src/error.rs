//! Error types for the admin client.

use kafcfg_reconciler::BrokerError;
use thiserror::Error;

/// Result type alias for admin client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Admin client error types.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to connect to {addr}: {reason}")]
    Connect { addr: String, reason: String },

    #[error("I/O error talking to {addr}: {source}")]
    Io {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("protocol error: {reason}")]
    Protocol { reason: String },

    #[error("TLS configuration error: {reason}")]
    Tls { reason: String },

    #[error("SASL authentication failed: {reason}")]
    Sasl { reason: String },

    #[error("controller not available: {reason}")]
    NoController { reason: String },
}

impl Error {
    /// Create a connect error.
    pub fn connect(addr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Connect {
            addr: addr.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(addr: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            addr: addr.into(),
            source,
        }
    }

    /// Create a protocol error.
    pub fn protocol(reason: impl Into<String>) -> Self {
        Self::Protocol {
            reason: reason.into(),
        }
    }

    /// Create a TLS error.
    pub fn tls(reason: impl Into<String>) -> Self {
        Self::Tls {
            reason: reason.into(),
        }
    }

    /// Create a SASL error.
    pub fn sasl(reason: impl Into<String>) -> Self {
        Self::Sasl {
            reason: reason.into(),
        }
    }

    /// Create a no-controller error.
    pub fn no_controller(reason: impl Into<String>) -> Self {
        Self::NoController {
            reason: reason.into(),
        }
    }
}

impl From<Error> for BrokerError {
    fn from(err: Error) -> Self {
        match err {
            Error::Protocol { reason } => Self::malformed(reason),
            other => Self::transport(other.to_string()),
        }
    }
}
