//! Realtime livestream gateway client
//!
//! Client-side implementation of the "radio" realtime protocol used by the
//! livestream platform's gateway: a single acknowledgement-capable socket
//! connection multiplexed into typed request/response exchanges and push
//! event streams (chat chatter, poll lifecycle, creator notifications).
//!
//! # Architecture
//!
//! ```text
//!   application code
//!        │ join / leave / send            ClientEvent stream
//!        ▼                                      ▲
//!   ┌─────────────────────────────────────────────────┐
//!   │ RadioClient                                     │
//!   │   status (watch)   membership   history   polls │
//!   └───────┬─────────────────────────────▲───────────┘
//!           │ RequestEvent → WireValue    │ PushEvent ← WireValue
//!           ▼                             │
//!   ┌──────────────┐              ┌───────┴──────┐
//!   │ wire (codec) │              │ events       │
//!   └───────┬──────┘              │ (registry)   │
//!           │                     └───────▲──────┘
//!           ▼                             │
//!   ┌─────────────────────────────────────┴───────────┐
//!   │ Transport (collaborator: emit / ack / push)     │
//!   └─────────────────────────────────────────────────┘
//! ```
//!
//! The [`Transport`](client::Transport) is a capability handed to the client;
//! this crate performs no socket I/O of its own and no automatic reconnect.

pub mod client;
pub mod error;
pub mod events;
pub mod render;
pub mod wire;

pub use client::{ClientConfig, ClientEvent, ConnectionStatus, RadioClient, Transport};
pub use error::{Error, Result, TransportError};
pub use wire::WireValue;
