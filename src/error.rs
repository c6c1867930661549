//! Error types
//!
//! Parse-level failures live in [`ProtocolError`]; everything the public API
//! can return is folded into [`Error`].

use thiserror::Error;

use crate::registry::RegistryError;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure (read, write, connect)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Inbound stream could not be parsed; the connection must be abandoned
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Subscription registry rejected the operation
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Subject is not valid for publishing
    #[error("Invalid subject: {0:?}")]
    InvalidSubject(String),

    /// Payload exceeds the server's advertised maximum
    #[error("Payload too large: {size} bytes (server max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Server sent -ERR and the connection policy treats it as fatal
    #[error("Server error: {0}")]
    Server(String),

    /// Connection URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The connection has been closed
    #[error("Not connected")]
    NotConnected,
}

/// Errors raised by the frame parser
///
/// Every variant is fatal for the connection. Malformed control lines are
/// reported as events instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Payload byte accounting no longer matches the declared frame boundary
    #[error("framing desync on sid {sid}: {reason}")]
    FramingDesync { sid: String, reason: String },

    /// A control line grew past the configured limit without a terminator
    #[error("control line exceeds {limit} bytes")]
    ControlLineTooLong { limit: usize },

    /// The parser already failed and refuses further input
    #[error("parser is desynchronized")]
    Desynchronized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_converts() {
        let err: Error = ProtocolError::ControlLineTooLong { limit: 16 }.into();
        assert!(matches!(err, Error::Protocol(_)));
        assert_eq!(err.to_string(), "Protocol error: control line exceeds 16 bytes");
    }

    #[test]
    fn test_registry_error_converts() {
        let err: Error = RegistryError::InvalidPattern("a..b".into()).into();
        assert!(matches!(err, Error::Registry(RegistryError::InvalidPattern(_))));
    }

    #[test]
    fn test_payload_too_large_display() {
        let err = Error::PayloadTooLarge { size: 10, max: 4 };
        assert_eq!(err.to_string(), "Payload too large: 10 bytes (server max 4)");
    }
}
