//! In-memory chat history
//!
//! Per-channel, ordered, append-only message sequences, retained in memory
//! only. A message id is the de-duplication key: the gateway delivers both a
//! direct acknowledgement and a self-echo push for a sent message, and only
//! the push may land here. Divergent content under a known id is a protocol
//! violation to be logged by the caller, never merged.

use std::collections::{HashMap, HashSet};

use crate::events::ChatMessage;

/// Result of attempting to append a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// New id, appended to the channel's sequence
    Appended,
    /// Known id with identical content, dropped
    Duplicate,
    /// Known id with different content, dropped (protocol violation)
    Conflicting,
}

#[derive(Debug, Default)]
struct ChannelHistory {
    messages: Vec<ChatMessage>,
    seen: HashSet<String>,
}

/// Append-only message history across channels
#[derive(Debug, Default)]
pub struct ChatHistory {
    channels: HashMap<String, ChannelHistory>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to its channel's sequence, de-duplicating by id
    ///
    /// The `success` echo flag is not part of message content for the
    /// purpose of conflict detection.
    pub fn append(&mut self, message: ChatMessage) -> AppendOutcome {
        let channel = self.channels.entry(message.channel.clone()).or_default();

        if channel.seen.contains(&message.id) {
            return match channel.messages.iter().find(|m| m.id == message.id) {
                Some(existing) if same_content(existing, &message) => AppendOutcome::Duplicate,
                _ => AppendOutcome::Conflicting,
            };
        }

        channel.seen.insert(message.id.clone());
        channel.messages.push(message);
        AppendOutcome::Appended
    }

    /// Snapshot of a channel's sequence, oldest first
    pub fn channel(&self, channel: &str) -> &[ChatMessage] {
        self.channels
            .get(channel)
            .map(|c| c.messages.as_slice())
            .unwrap_or(&[])
    }

    /// Total messages retained across all channels
    pub fn len(&self) -> usize {
        self.channels.values().map(|c| c.messages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn same_content(a: &ChatMessage, b: &ChatMessage) -> bool {
    a.channel == b.channel
        && a.user_guid == b.user_guid
        && a.username == b.username
        && a.user_role == b.user_role
        && a.message == b.message
        && a.emotes == b.emotes
}
