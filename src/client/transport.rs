//! Transport collaborator seam
//!
//! The client performs no socket I/O. It is handed a [`Transport`]
//! capability: a bidirectional, event-named, acknowledgement-capable socket
//! (room-capable pub/sub style). Everything the core needs from it is
//! expressed here; socket.io-style implementations live outside this crate.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::wire::WireValue;

/// Identity of an outgoing request, assigned by the transport
///
/// Acknowledgements are correlated back to their request through this id;
/// the acknowledgement callback path fires at most once per request.
pub type RequestId = u64;

/// One frame on a connection's ordered event stream
///
/// The transport delivers all incoming events for a connection on a single
/// ordered stream; there is no concurrent decode of two frames from the
/// same connection.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// An unsolicited push event
    Message { event: String, payload: WireValue },

    /// Acknowledgement of an outgoing request
    Ack {
        request: RequestId,
        payload: WireValue,
    },

    /// The connection is gone. `error` is `None` for an orderly close.
    Disconnected { error: Option<TransportError> },
}

/// Bidirectional, acknowledgement-capable socket transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the underlying socket
    ///
    /// On success, returns the connection's ordered event stream. A fresh
    /// stream is returned per successful connect.
    async fn connect(&self) -> Result<mpsc::UnboundedReceiver<TransportEvent>, TransportError>;

    /// Close the underlying socket
    async fn disconnect(&self);

    /// Allocate the identity for the next outgoing request
    fn next_request_id(&self) -> RequestId;

    /// Emit a named event
    ///
    /// With `request` set, the gateway's acknowledgement is delivered as
    /// [`TransportEvent::Ack`] carrying the same id; with `None` the emit is
    /// fire-and-forget.
    async fn emit(
        &self,
        event: &str,
        payload: WireValue,
        request: Option<RequestId>,
    ) -> Result<(), TransportError>;

    /// Default acknowledgement bound for this transport
    ///
    /// Overridable per client via
    /// [`ClientConfig`](super::config::ClientConfig).
    fn ack_timeout(&self) -> Duration {
        Duration::from_secs(10)
    }
}
