//! Realtime channel client
//!
//! Owns the socket connection lifecycle, request/acknowledgement
//! correlation, room-membership bookkeeping, and the live stream of decoded
//! chat and poll events. One logical connection per [`RadioClient`]
//! instance; lifecycle operations (`connect`/`disconnect`) must be
//! serialized by the caller, while sends may be issued concurrently: each
//! is correlated independently and never blocks another.

pub mod channel;
pub mod config;
pub mod history;
pub mod membership;
pub mod polls;
pub mod stats;
pub mod status;
pub mod transport;

pub use channel::{ClientEvent, RadioClient};
pub use config::ClientConfig;
pub use history::{AppendOutcome, ChatHistory};
pub use membership::RoomMembership;
pub use polls::{PollState, PollStore, PollTransition, TallyOutcome};
pub use stats::ClientStats;
pub use status::ConnectionStatus;
pub use transport::{RequestId, Transport, TransportEvent};
