//! Client configuration

use std::time::Duration;

/// Client configuration options
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Acknowledgement bound for requests; `None` defers to the transport's
    /// default. A request with no acknowledgement within the bound fails
    /// with `AckTimeout`; retry is a caller decision.
    pub ack_timeout: Option<Duration>,

    /// Separate bound for the connect handshake; `None` uses the
    /// acknowledgement bound.
    pub handshake_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a config that defers everything to the transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the acknowledgement bound
    pub fn ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout = Some(timeout);
        self
    }

    /// Set the handshake bound
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = Some(timeout);
        self
    }
}
