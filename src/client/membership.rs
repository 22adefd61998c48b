//! Room membership bookkeeping
//!
//! Two separate namespaces: chat channels (`/live/{streamId}`) and poll
//! rooms (creator ids). Mutated only by successful join/leave
//! acknowledgements; cleared wholesale on disconnect, before observers see
//! the terminal status, so a "connected" status never coexists with stale
//! membership.

use std::collections::HashSet;

/// Currently-joined chat channels and poll rooms
#[derive(Debug, Clone, Default)]
pub struct RoomMembership {
    chat_channels: HashSet<String>,
    poll_rooms: HashSet<String>,
}

impl RoomMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a joined chat channel; returns false if already joined
    pub fn join_chat(&mut self, channel: &str) -> bool {
        self.chat_channels.insert(channel.to_string())
    }

    /// Remove a chat channel; returns false if it was not joined
    pub fn leave_chat(&mut self, channel: &str) -> bool {
        self.chat_channels.remove(channel)
    }

    pub fn has_chat(&self, channel: &str) -> bool {
        self.chat_channels.contains(channel)
    }

    /// Record a joined poll room; returns false if already joined
    pub fn join_poll(&mut self, creator_id: &str) -> bool {
        self.poll_rooms.insert(creator_id.to_string())
    }

    /// Remove a poll room; returns false if it was not joined
    pub fn leave_poll(&mut self, creator_id: &str) -> bool {
        self.poll_rooms.remove(creator_id)
    }

    pub fn has_poll(&self, creator_id: &str) -> bool {
        self.poll_rooms.contains(creator_id)
    }

    /// Joined chat channels, no particular order
    pub fn chat_channels(&self) -> impl Iterator<Item = &str> {
        self.chat_channels.iter().map(String::as_str)
    }

    /// Joined poll rooms, no particular order
    pub fn poll_rooms(&self) -> impl Iterator<Item = &str> {
        self.poll_rooms.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.chat_channels.is_empty() && self.poll_rooms.is_empty()
    }

    /// Drop all membership in both namespaces
    pub fn clear(&mut self) {
        self.chat_channels.clear();
        self.poll_rooms.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_leave_chat() {
        let mut membership = RoomMembership::new();

        assert!(membership.join_chat("/live/123"));
        assert!(membership.has_chat("/live/123"));
        // Second join of the same channel is a no-op
        assert!(!membership.join_chat("/live/123"));

        assert!(membership.leave_chat("/live/123"));
        assert!(!membership.has_chat("/live/123"));
        assert!(!membership.leave_chat("/live/123"));
    }

    #[test]
    fn test_namespaces_are_separate() {
        let mut membership = RoomMembership::new();
        membership.join_chat("creator-1");
        assert!(!membership.has_poll("creator-1"));

        membership.join_poll("creator-1");
        membership.leave_chat("creator-1");
        assert!(membership.has_poll("creator-1"));
    }

    #[test]
    fn test_clear_empties_both() {
        let mut membership = RoomMembership::new();
        membership.join_chat("/live/1");
        membership.join_chat("/live/2");
        membership.join_poll("creator-1");

        membership.clear();
        assert!(membership.is_empty());
        assert_eq!(membership.chat_channels().count(), 0);
        assert_eq!(membership.poll_rooms().count(), 0);
    }
}
