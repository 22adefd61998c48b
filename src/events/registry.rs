//! Push event resolution
//!
//! Maps an incoming wire event name to exactly one payload variant and
//! decodes it. Names outside the registered set are a decode error; the
//! caller logs and drops the event without touching the connection.

use crate::wire::{Decode, DecodeError, WireValue};

use super::chat::ChatMessage;
use super::notification::{CreatorMenuUpdate, CreatorNotification, PostRelease};
use super::poll::{PollOpenClose, TallyUpdate};
use super::{
    PUSH_CREATOR_MENU_UPDATE, PUSH_CREATOR_NOTIFICATION, PUSH_POLL_OPEN_CLOSE,
    PUSH_POLL_UPDATE_TALLY, PUSH_POST_RELEASE, PUSH_RADIO_CHATTER,
};

/// A decoded push event, one variant per registered wire name
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    RadioChatter(ChatMessage),
    PollOpenClose(PollOpenClose),
    PollUpdateTally(TallyUpdate),
    CreatorNotification(CreatorNotification),
    PostRelease(PostRelease),
    CreatorMenuUpdate(CreatorMenuUpdate),
}

impl PushEvent {
    /// Every registered push event name
    pub const NAMES: [&'static str; 6] = [
        PUSH_RADIO_CHATTER,
        PUSH_POLL_OPEN_CLOSE,
        PUSH_POLL_UPDATE_TALLY,
        PUSH_CREATOR_NOTIFICATION,
        PUSH_POST_RELEASE,
        PUSH_CREATOR_MENU_UPDATE,
    ];

    /// Resolve a wire event name and decode its payload
    pub fn decode(event: &str, payload: &WireValue) -> Result<Self, DecodeError> {
        match event {
            PUSH_RADIO_CHATTER => Ok(Self::RadioChatter(ChatMessage::decode(payload)?)),
            PUSH_POLL_OPEN_CLOSE => Ok(Self::PollOpenClose(PollOpenClose::decode(payload)?)),
            PUSH_POLL_UPDATE_TALLY => Ok(Self::PollUpdateTally(TallyUpdate::decode(payload)?)),
            PUSH_CREATOR_NOTIFICATION => {
                Ok(Self::CreatorNotification(CreatorNotification::decode(payload)?))
            }
            PUSH_POST_RELEASE => Ok(Self::PostRelease(PostRelease::decode(payload)?)),
            PUSH_CREATOR_MENU_UPDATE => {
                Ok(Self::CreatorMenuUpdate(CreatorMenuUpdate::decode(payload)?))
            }
            other => Err(DecodeError::UnknownEvent(other.to_string())),
        }
    }

    /// The constant wire name of this event
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::RadioChatter(_) => PUSH_RADIO_CHATTER,
            Self::PollOpenClose(_) => PUSH_POLL_OPEN_CLOSE,
            Self::PollUpdateTally(_) => PUSH_POLL_UPDATE_TALLY,
            Self::CreatorNotification(_) => PUSH_CREATOR_NOTIFICATION,
            Self::PostRelease(_) => PUSH_POST_RELEASE,
            Self::CreatorMenuUpdate(_) => PUSH_CREATOR_MENU_UPDATE,
        }
    }
}
