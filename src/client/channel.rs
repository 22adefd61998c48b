//! Channel client
//!
//! Multiplexes one socket connection into typed request/acknowledgement
//! exchanges and push event streams. All incoming frames for a connection
//! arrive on a single ordered stream consumed by one dispatch task; outgoing
//! requests may be issued concurrently and are correlated independently
//! through transport-assigned request ids.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use radio_rs::client::{RadioClient, Transport};
//!
//! # async fn example(transport: Arc<dyn Transport>) -> radio_rs::Result<()> {
//! let (client, mut events) = RadioClient::new(transport);
//!
//! tokio::spawn(async move {
//!     while let Some(event) = events.recv().await {
//!         println!("Event: {:?}", event);
//!     }
//! });
//!
//! client.connect().await?;
//! client.join_chat_channel("/live/123").await?;
//! client.send_chat_message("/live/123", "hi :wave:").await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;

use crate::error::{Error, Result, TransportError};
use crate::events::{
    request_envelope, ChatMessage, ChatUserList, CreatorMenuUpdate, CreatorNotification,
    GetChatUserList, JoinChatChannel, JoinPollRoom, LeaveChatChannel, LeavePollRoom, Poll,
    PostRelease, PushEvent, RequestEvent, ResponseEnvelope, SendChatAck, SendChatMessage,
    SocketConnect, Tally,
};
use crate::wire::{Decode, WireValue};

use super::config::ClientConfig;
use super::history::{AppendOutcome, ChatHistory};
use super::membership::RoomMembership;
use super::polls::{PollState, PollStore, PollTransition, TallyOutcome};
use super::stats::ClientStats;
use super::status::ConnectionStatus;
use super::transport::{RequestId, Transport, TransportEvent};

/// Decoded activity delivered to the consumer, in arrival order
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// A chat message was appended to its channel's history
    MessageReceived(ChatMessage),

    /// A poll opened in a joined poll room
    PollOpened(Poll),

    /// A poll's running tally advanced
    PollTally { poll_id: String, tally: Tally },

    /// A poll was finalized
    PollClosed(Poll),

    /// Forwarded unchanged to the notification collaborator
    CreatorNotification(CreatorNotification),

    /// Forwarded unchanged to the notification collaborator
    PostRelease(PostRelease),

    /// Forwarded unchanged to the notification collaborator
    CreatorMenuUpdate(CreatorMenuUpdate),
}

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Realtime gateway client
///
/// One logical connection per instance. Constructed around a [`Transport`]
/// capability; performs no I/O of its own and never reconnects
/// automatically.
pub struct RadioClient {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    status_tx: watch::Sender<ConnectionStatus>,
    event_tx: mpsc::Sender<ClientEvent>,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    membership: RoomMembership,
    history: ChatHistory,
    polls: PollStore,
    pending: HashMap<RequestId, oneshot::Sender<Result<WireValue>>>,
    dispatch: Option<JoinHandle<()>>,
    stats: ClientStats,
}

impl RadioClient {
    /// Create a client with default configuration.
    ///
    /// Returns the client and the receiver for its event stream.
    pub fn new(transport: Arc<dyn Transport>) -> (Self, mpsc::Receiver<ClientEvent>) {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Create a client with explicit configuration
    pub fn with_config(
        transport: Arc<dyn Transport>,
        config: ClientConfig,
    ) -> (Self, mpsc::Receiver<ClientEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (status_tx, _) = watch::channel(ConnectionStatus::NotConnected);

        let client = Self {
            inner: Arc::new(Inner {
                transport,
                config,
                status_tx,
                event_tx,
                state: Mutex::new(State::default()),
            }),
        };

        (client, event_rx)
    }

    /// Observable connection status
    pub fn status(&self) -> watch::Receiver<ConnectionStatus> {
        self.inner.status_tx.subscribe()
    }

    /// Current connection status
    pub fn current_status(&self) -> ConnectionStatus {
        *self.inner.status_tx.borrow()
    }

    /// Open the connection and perform the gateway handshake.
    ///
    /// Transitions `Connecting → Connected` only once the handshake event is
    /// acknowledged; a transport failure or missing acknowledgement lands in
    /// `UnexpectedlyDisconnected`. Lifecycle calls must be serialized by the
    /// caller.
    pub async fn connect(&self) -> Result<()> {
        match self.current_status() {
            ConnectionStatus::Connected | ConnectionStatus::Connecting => {
                tracing::warn!(status = %self.current_status(), "connect ignored, already in progress");
                return Ok(());
            }
            _ => {}
        }
        self.inner.status_tx.send_replace(ConnectionStatus::Connecting);

        let events = match self.inner.transport.connect().await {
            Ok(events) => events,
            Err(err) => {
                tracing::warn!(error = %err, "transport connect failed");
                self.inner
                    .status_tx
                    .send_replace(ConnectionStatus::UnexpectedlyDisconnected);
                return Err(err.into());
            }
        };

        {
            let mut state = self.inner.state.lock().await;
            state.dispatch = Some(tokio::spawn(dispatch_loop(
                Arc::clone(&self.inner),
                events,
            )));
        }

        let timeout = self
            .inner
            .config
            .handshake_timeout
            .or(self.inner.config.ack_timeout)
            .unwrap_or_else(|| self.inner.transport.ack_timeout());

        match self.request_with_timeout(&SocketConnect, timeout).await {
            Ok(_) => {
                self.inner.status_tx.send_replace(ConnectionStatus::Connected);
                tracing::info!("gateway handshake acknowledged");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "gateway handshake failed");
                self.inner
                    .teardown(
                        ConnectionStatus::UnexpectedlyDisconnected,
                        TransportError::ConnectionClosed,
                        true,
                    )
                    .await;
                self.inner.transport.disconnect().await;
                Err(err)
            }
        }
    }

    /// Close the connection.
    ///
    /// Clears all room membership and resolves outstanding requests as
    /// failed before observers see `DisconnectedBySelf`.
    pub async fn disconnect(&self) {
        match self.current_status() {
            ConnectionStatus::Connecting | ConnectionStatus::Connected => {}
            status => {
                tracing::debug!(status = %status, "disconnect ignored, not connected");
                return;
            }
        }
        self.inner
            .teardown(
                ConnectionStatus::DisconnectedBySelf,
                TransportError::ConnectionClosed,
                true,
            )
            .await;
        self.inner.transport.disconnect().await;
        tracing::info!("disconnected by self");
    }

    /// Join a chat channel (`/live/{streamId}`). Idempotent if already
    /// joined; membership is recorded only on acknowledgement.
    pub async fn join_chat_channel(&self, channel: &str) -> Result<()> {
        {
            let state = self.inner.state.lock().await;
            if state.membership.has_chat(channel) {
                return Ok(());
            }
        }

        let envelope = self
            .request(&JoinChatChannel {
                channel: channel.to_string(),
            })
            .await?;
        self.check_success::<JoinChatChannel>(&envelope)?;

        let mut state = self.inner.state.lock().await;
        state.membership.join_chat(channel);
        tracing::info!(channel = %channel, "joined chat channel");
        Ok(())
    }

    /// Leave a chat channel. Future pushes for the channel are dropped.
    pub async fn leave_chat_channel(&self, channel: &str) -> Result<()> {
        {
            let state = self.inner.state.lock().await;
            if !state.membership.has_chat(channel) {
                return Ok(());
            }
        }

        let envelope = self
            .request(&LeaveChatChannel {
                channel: channel.to_string(),
            })
            .await?;
        self.check_success::<LeaveChatChannel>(&envelope)?;

        let mut state = self.inner.state.lock().await;
        state.membership.leave_chat(channel);
        tracing::info!(channel = %channel, "left chat channel");
        Ok(())
    }

    /// Send chatter to a joined channel.
    ///
    /// The acknowledgement is used only to detect send failure; the message
    /// itself reaches history through its own `radioChatter` echo.
    pub async fn send_chat_message(&self, channel: &str, message: &str) -> Result<()> {
        {
            let state = self.inner.state.lock().await;
            if !state.membership.has_chat(channel) {
                return Err(Error::NotJoined {
                    room: channel.to_string(),
                });
            }
        }

        let envelope = self
            .request(&SendChatMessage {
                channel: channel.to_string(),
                message: message.to_string(),
            })
            .await?;
        let ack: SendChatAck = envelope.decode_body()?;
        if !envelope.is_success() || !ack.success {
            let reason = ack
                .reason
                .unwrap_or_else(|| format!("status {}", envelope.status_code));
            return Err(Error::GatewayRejected {
                url: SendChatMessage::URL.to_string(),
                reason,
            });
        }
        Ok(())
    }

    /// Fetch the roster of a joined channel
    pub async fn chat_user_list(&self, channel: &str) -> Result<ChatUserList> {
        {
            let state = self.inner.state.lock().await;
            if !state.membership.has_chat(channel) {
                return Err(Error::NotJoined {
                    room: channel.to_string(),
                });
            }
        }

        let envelope = self
            .request(&GetChatUserList {
                channel: channel.to_string(),
            })
            .await?;
        self.check_success::<GetChatUserList>(&envelope)?;
        Ok(envelope.decode_body()?)
    }

    /// Join a creator's poll room. Idempotent if already joined.
    pub async fn join_poll_room(&self, creator_id: &str) -> Result<()> {
        {
            let state = self.inner.state.lock().await;
            if state.membership.has_poll(creator_id) {
                return Ok(());
            }
        }

        let envelope = self
            .request(&JoinPollRoom {
                creator_id: creator_id.to_string(),
            })
            .await?;
        self.check_success::<JoinPollRoom>(&envelope)?;

        let mut state = self.inner.state.lock().await;
        state.membership.join_poll(creator_id);
        tracing::info!(creator = %creator_id, "joined poll room");
        Ok(())
    }

    /// Leave a creator's poll room
    pub async fn leave_poll_room(&self, creator_id: &str) -> Result<()> {
        {
            let state = self.inner.state.lock().await;
            if !state.membership.has_poll(creator_id) {
                return Ok(());
            }
        }

        let envelope = self
            .request(&LeavePollRoom {
                creator_id: creator_id.to_string(),
            })
            .await?;
        self.check_success::<LeavePollRoom>(&envelope)?;

        let mut state = self.inner.state.lock().await;
        state.membership.leave_poll(creator_id);
        tracing::info!(creator = %creator_id, "left poll room");
        Ok(())
    }

    /// Snapshot of a channel's message history, oldest first
    pub async fn messages(&self, channel: &str) -> Vec<ChatMessage> {
        self.inner.state.lock().await.history.channel(channel).to_vec()
    }

    /// Snapshot of a tracked poll
    pub async fn poll_state(&self, poll_id: &str) -> Option<PollState> {
        self.inner.state.lock().await.polls.get(poll_id).cloned()
    }

    /// Currently joined chat channels
    pub async fn joined_chat_channels(&self) -> Vec<String> {
        let state = self.inner.state.lock().await;
        state.membership.chat_channels().map(str::to_string).collect()
    }

    /// Currently joined poll rooms
    pub async fn joined_poll_rooms(&self) -> Vec<String> {
        let state = self.inner.state.lock().await;
        state.membership.poll_rooms().map(str::to_string).collect()
    }

    /// Counters for this client's lifetime
    pub async fn stats(&self) -> ClientStats {
        self.inner.state.lock().await.stats
    }

    /// Send a request with the configured acknowledgement bound
    async fn request<R: RequestEvent>(&self, request: &R) -> Result<ResponseEnvelope> {
        let timeout = self
            .inner
            .config
            .ack_timeout
            .unwrap_or_else(|| self.inner.transport.ack_timeout());
        self.request_with_timeout(request, timeout).await
    }

    /// Send a request and await its acknowledgement, timeout, or
    /// disconnect, whichever happens first.
    async fn request_with_timeout<R: RequestEvent>(
        &self,
        request: &R,
        timeout: Duration,
    ) -> Result<ResponseEnvelope> {
        let envelope = request_envelope(request)?;

        // Register the pending slot before emitting so an immediate
        // acknowledgement cannot race the insert.
        let id = self.inner.transport.next_request_id();
        let (ack_tx, ack_rx) = oneshot::channel();
        {
            let mut state = self.inner.state.lock().await;
            state.pending.insert(id, ack_tx);
            state.stats.requests_sent += 1;
        }

        if let Err(err) = self
            .inner
            .transport
            .emit(R::METHOD.as_str(), envelope, Some(id))
            .await
        {
            let mut state = self.inner.state.lock().await;
            state.pending.remove(&id);
            return Err(err.into());
        }
        tracing::debug!(url = R::URL, request = id, "request emitted");

        let ack = match tokio::time::timeout(timeout, ack_rx).await {
            Ok(Ok(resolution)) => resolution?,
            // Sender dropped without resolving; treat as a lost connection
            Ok(Err(_)) => return Err(Error::Transport(TransportError::ConnectionClosed)),
            Err(_) => {
                let mut state = self.inner.state.lock().await;
                state.pending.remove(&id);
                state.stats.ack_timeouts += 1;
                tracing::warn!(url = R::URL, request = id, "acknowledgement timed out");
                return Err(Error::AckTimeout {
                    url: R::URL.to_string(),
                });
            }
        };
        Ok(ResponseEnvelope::decode(&ack)?)
    }

    fn check_success<R: RequestEvent>(&self, envelope: &ResponseEnvelope) -> Result<()> {
        if envelope.is_success() {
            return Ok(());
        }
        Err(Error::GatewayRejected {
            url: R::URL.to_string(),
            reason: format!("status {}", envelope.status_code),
        })
    }
}

impl Inner {
    /// Tear down connection state.
    ///
    /// Membership is cleared and every outstanding request is resolved as
    /// failed before the terminal status is signaled, so observers never see
    /// a connected status with stale membership or a request left hanging.
    async fn teardown(
        &self,
        status: ConnectionStatus,
        error: TransportError,
        abort_dispatch: bool,
    ) {
        let (pending, dispatch) = {
            let mut state = self.state.lock().await;
            state.membership.clear();
            let dispatch = if abort_dispatch {
                state.dispatch.take()
            } else {
                None
            };
            (std::mem::take(&mut state.pending), dispatch)
        };

        for (_, ack_tx) in pending {
            let _ = ack_tx.send(Err(Error::Transport(error.clone())));
        }
        self.status_tx.send_replace(status);

        if let Some(handle) = dispatch {
            handle.abort();
        }
    }
}

/// Consume one connection's ordered event stream until it ends
async fn dispatch_loop(inner: Arc<Inner>, mut events: mpsc::UnboundedReceiver<TransportEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            TransportEvent::Ack { request, payload } => {
                let ack_tx = {
                    let mut state = inner.state.lock().await;
                    state.stats.acks_received += 1;
                    state.pending.remove(&request)
                };
                match ack_tx {
                    Some(ack_tx) => {
                        let _ = ack_tx.send(Ok(payload));
                    }
                    None => {
                        // Late ack after timeout, or a transport bug
                        tracing::debug!(request, "acknowledgement with no outstanding request");
                    }
                }
            }
            TransportEvent::Message { event, payload } => {
                if let Some(out) = handle_push(&inner, &event, payload).await {
                    let _ = inner.event_tx.send(out).await;
                }
            }
            TransportEvent::Disconnected { error } => {
                if *inner.status_tx.borrow() == ConnectionStatus::DisconnectedBySelf {
                    break;
                }
                tracing::warn!(error = ?error, "transport disconnected");
                inner
                    .teardown(
                        ConnectionStatus::UnexpectedlyDisconnected,
                        error.unwrap_or(TransportError::ConnectionClosed),
                        false,
                    )
                    .await;
                break;
            }
        }
    }
}

/// Decode and route one push event; returns the consumer-facing event, if
/// any survives membership gating and de-duplication.
async fn handle_push(inner: &Arc<Inner>, event: &str, payload: WireValue) -> Option<ClientEvent> {
    let mut state = inner.state.lock().await;
    state.stats.events_received += 1;

    let push = match PushEvent::decode(event, &payload) {
        Ok(push) => push,
        Err(err) => {
            state.stats.decode_failures += 1;
            tracing::warn!(event = %event, error = %err, "dropping undecodable push event");
            return None;
        }
    };

    match push {
        PushEvent::RadioChatter(message) => {
            if !state.membership.has_chat(&message.channel) {
                state.stats.unjoined_dropped += 1;
                tracing::debug!(channel = %message.channel, "chatter for unjoined channel dropped");
                return None;
            }
            match state.history.append(message.clone()) {
                AppendOutcome::Appended => {
                    state.stats.messages_appended += 1;
                    Some(ClientEvent::MessageReceived(message))
                }
                AppendOutcome::Duplicate => {
                    state.stats.duplicates_dropped += 1;
                    None
                }
                AppendOutcome::Conflicting => {
                    state.stats.duplicates_dropped += 1;
                    tracing::warn!(id = %message.id, "divergent content under a known message id");
                    None
                }
            }
        }
        PushEvent::PollOpenClose(open_close) => {
            let poll = open_close.poll;
            if !state.membership.has_poll(&poll.creator_id) {
                state.stats.unjoined_dropped += 1;
                tracing::debug!(creator = %poll.creator_id, "poll event for unjoined room dropped");
                return None;
            }
            match state.polls.open_or_close(poll.clone()) {
                PollTransition::Opened => Some(ClientEvent::PollOpened(poll)),
                PollTransition::Closed => Some(ClientEvent::PollClosed(poll)),
                PollTransition::AlreadyClosed => {
                    tracing::debug!(poll = %poll.id, "close for finalized poll dropped");
                    None
                }
            }
        }
        PushEvent::PollUpdateTally(update) => match state.polls.apply_tally(&update) {
            TallyOutcome::Applied => {
                state.stats.tallies_applied += 1;
                let tally = update.tally();
                Some(ClientEvent::PollTally {
                    poll_id: update.poll_id,
                    tally,
                })
            }
            outcome => {
                state.stats.tallies_dropped += 1;
                tracing::debug!(poll = %update.poll_id, ?outcome, "tally update dropped");
                None
            }
        },
        PushEvent::CreatorNotification(notification) => {
            Some(ClientEvent::CreatorNotification(notification))
        }
        PushEvent::PostRelease(post) => Some(ClientEvent::PostRelease(post)),
        PushEvent::CreatorMenuUpdate(menu) => Some(ClientEvent::CreatorMenuUpdate(menu)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Transport whose connect always fails; enough for lifecycle tests
    struct DownTransport;

    #[async_trait::async_trait]
    impl Transport for DownTransport {
        async fn connect(
            &self,
        ) -> std::result::Result<mpsc::UnboundedReceiver<TransportEvent>, TransportError> {
            Err(TransportError::ConnectFailed("down".into()))
        }

        async fn disconnect(&self) {}

        fn next_request_id(&self) -> RequestId {
            1
        }

        async fn emit(
            &self,
            _event: &str,
            _payload: WireValue,
            _request: Option<RequestId>,
        ) -> std::result::Result<(), TransportError> {
            Ok(())
        }
    }

    #[test]
    fn test_initial_state() {
        tokio_test::block_on(async {
            let (client, _events) = RadioClient::new(Arc::new(DownTransport));
            assert_eq!(client.current_status(), ConnectionStatus::NotConnected);
            assert!(client.messages("/live/1").await.is_empty());
            assert!(client.joined_chat_channels().await.is_empty());
            assert_eq!(client.stats().await, ClientStats::new());
        });
    }

    #[test]
    fn test_failed_connect_is_unexpected_disconnect() {
        tokio_test::block_on(async {
            let (client, _events) = RadioClient::new(Arc::new(DownTransport));
            let err = client.connect().await.expect_err("transport is down");
            assert!(matches!(err, Error::Transport(_)));
            assert_eq!(
                client.current_status(),
                ConnectionStatus::UnexpectedlyDisconnected
            );
        });
    }

    #[test]
    fn test_disconnect_before_connect_is_noop() {
        tokio_test::block_on(async {
            let (client, _events) = RadioClient::new(Arc::new(DownTransport));
            client.disconnect().await;
            assert_eq!(client.current_status(), ConnectionStatus::NotConnected);
        });
    }

    #[test]
    fn test_send_without_connection_requires_membership_first() {
        tokio_test::block_on(async {
            let (client, _events) = RadioClient::new(Arc::new(DownTransport));
            let err = client
                .send_chat_message("/live/123", "hi")
                .await
                .expect_err("never joined");
            assert!(matches!(err, Error::NotJoined { .. }));
        });
    }
}
