//! Crate error types
//!
//! Only transport-level failures are fatal to a connection. Codec and
//! membership errors are local to the operation that raised them and leave
//! the connection up.

use thiserror::Error;

use crate::wire::{DecodeError, EncodeError};

/// Top-level error type for client operations
#[derive(Error, Debug)]
pub enum Error {
    /// Connection-level failure. Surfaced to observers as
    /// `ConnectionStatus::UnexpectedlyDisconnected`.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Malformed or unexpected wire shape on an incoming payload.
    /// The offending event is dropped and logged; the connection stays up.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Programmer error while encoding an outgoing payload. The operation
    /// is aborted; the connection stays up.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Action attempted against a channel or poll room that is not
    /// currently joined.
    #[error("not joined: {room}")]
    NotJoined { room: String },

    /// No acknowledgement arrived within the bound. Retry is a caller
    /// decision, never automatic.
    #[error("acknowledgement timeout for {url}")]
    AckTimeout { url: String },

    /// The gateway acknowledged a request but refused it (rate limit,
    /// invalid emote, join refused, ...).
    #[error("{url} rejected by gateway: {reason}")]
    GatewayRejected { url: String, reason: String },
}

/// Transport collaborator failures
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// Could not open the underlying socket
    #[error("connection failed: {0}")]
    ConnectFailed(String),

    /// The connection dropped or was closed while in use. Outstanding
    /// requests are resolved with this error, never left hanging.
    #[error("connection closed")]
    ConnectionClosed,

    /// The transport reported an I/O-level fault
    #[error("transport I/O error: {0}")]
    Io(String),
}

/// Convenience result type for client operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotJoined {
            room: "/live/123".to_string(),
        };
        assert_eq!(err.to_string(), "not joined: /live/123");

        let err = Error::AckTimeout {
            url: "/api/v3/socket/connect".to_string(),
        };
        assert!(err.to_string().contains("/api/v3/socket/connect"));
    }

    #[test]
    fn test_transport_error_wraps() {
        let err: Error = TransportError::ConnectionClosed.into();
        assert!(matches!(err, Error::Transport(_)));
    }
}
