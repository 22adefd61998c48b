//! Chat channel events
//!
//! Chat channels are livestream-scoped rooms identified as `/live/{id}`
//! ("radio frequencies" in the gateway's naming). Joining a frequency starts
//! the flow of `radioChatter` push events; sending chatter is a request whose
//! acknowledgement only reports success or failure; the canonical record of
//! a sent message is its own `radioChatter` echo.

use crate::wire::{
    Decode, DecodeError, Encode, EncodeError, Encoder, MapEncoder, MapReader, WireValue,
};

use super::{Method, RequestEvent};

/// Sender role within a chat channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Normal,
    Moderator,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Normal => "Normal",
            UserRole::Moderator => "Moderator",
        }
    }
}

impl Encode for UserRole {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        enc.emit(self.as_str())
    }
}

impl Decode for UserRole {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        match String::decode(value)?.as_str() {
            "Normal" => Ok(UserRole::Normal),
            "Moderator" => Ok(UserRole::Moderator),
            other => Err(DecodeError::InvalidValue {
                field: "userType",
                value: other.to_string(),
            }),
        }
    }
}

/// An emote resolved by the gateway at send time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emote {
    /// Token between colons in the message text, without the colons
    pub code: String,
    /// Image path on the platform's CDN
    pub image: String,
}

impl Encode for Emote {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        let map = MapEncoder::new()
            .field("code", &self.code)?
            .field("image", &self.image)?
            .finish();
        enc.emit(map)
    }
}

impl Decode for Emote {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        let reader = MapReader::new(value)?;
        Ok(Self {
            code: reader.required("code")?,
            image: reader.required("image")?,
        })
    }
}

/// A chat message as delivered by a `radioChatter` push
///
/// Immutable once received; appended to the owning channel's in-memory
/// history and never persisted by this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    /// Channel the message belongs to, `/live/{streamId}`
    pub channel: String,
    /// Sender's stable identifier
    pub user_guid: String,
    /// Sender's display name
    pub username: String,
    pub user_role: UserRole,
    /// Raw message text; emote tokens appear as `:code:`
    pub message: String,
    /// Emotes the gateway resolved at send time
    pub emotes: Option<Vec<Emote>>,
    /// Present only on self-sent echoes
    pub success: Option<bool>,
}

impl Encode for ChatMessage {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        let map = MapEncoder::new()
            .field("id", &self.id)?
            .field("channel", &self.channel)?
            .field("userGUID", &self.user_guid)?
            .field("username", &self.username)?
            .field("userType", &self.user_role)?
            .field("message", &self.message)?
            .optional("emotes", &self.emotes)?
            .optional("success", &self.success)?
            .finish();
        enc.emit(map)
    }
}

impl Decode for ChatMessage {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        let reader = MapReader::new(value)?;
        Ok(Self {
            id: reader.required("id")?,
            channel: reader.required("channel")?,
            user_guid: reader.required("userGUID")?,
            username: reader.required("username")?,
            user_role: reader.required("userType")?,
            message: reader.required("message")?,
            emotes: reader.optional("emotes")?,
            success: reader.optional("success")?,
        })
    }
}

/// Join a chat channel (radio frequency)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinChatChannel {
    pub channel: String,
}

impl Encode for JoinChatChannel {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        enc.emit(MapEncoder::new().field("channel", &self.channel)?.finish())
    }
}

impl RequestEvent for JoinChatChannel {
    const METHOD: Method = Method::Post;
    const URL: &'static str = "/RadioMessage/joinLivestreamRadioFrequency";

    type Response = WireValue;
}

/// Leave a chat channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveChatChannel {
    pub channel: String,
}

impl Encode for LeaveChatChannel {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        enc.emit(MapEncoder::new().field("channel", &self.channel)?.finish())
    }
}

impl RequestEvent for LeaveChatChannel {
    const METHOD: Method = Method::Post;
    const URL: &'static str = "/RadioMessage/leaveLivestreamRadioFrequency";

    type Response = WireValue;
}

/// Send chatter to a joined channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendChatMessage {
    pub channel: String,
    pub message: String,
}

impl Encode for SendChatMessage {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        let map = MapEncoder::new()
            .field("channel", &self.channel)?
            .field("message", &self.message)?
            .finish();
        enc.emit(map)
    }
}

impl RequestEvent for SendChatMessage {
    const METHOD: Method = Method::Post;
    const URL: &'static str = "/RadioMessage/sendLivestreamRadioChatter/";

    type Response = SendChatAck;
}

/// Acknowledgement body for a chatter send
///
/// Success acks echo the message object; failure acks carry a bare reason
/// string (rate limit, invalid emote, ...). Either way the ack is only a
/// success/failure signal; history is fed by the push echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendChatAck {
    pub success: bool,
    pub reason: Option<String>,
}

impl Decode for SendChatAck {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::String(reason) => Ok(Self {
                success: false,
                reason: Some(reason.clone()),
            }),
            WireValue::Null => Ok(Self {
                success: true,
                reason: None,
            }),
            other => {
                let reader = MapReader::new(other)?;
                let success = reader.optional("success")?.unwrap_or(true);
                let reason = if success {
                    None
                } else {
                    reader.optional("message")?
                };
                Ok(Self { success, reason })
            }
        }
    }
}

/// Query the user list of a joined channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetChatUserList {
    pub channel: String,
}

impl Encode for GetChatUserList {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        enc.emit(MapEncoder::new().field("channel", &self.channel)?.finish())
    }
}

impl RequestEvent for GetChatUserList {
    const METHOD: Method = Method::Get;
    const URL: &'static str = "/RadioMessage/getChatUserList/";

    type Response = ChatUserList;
}

/// Channel roster, split by role in the gateway's radio naming
///
/// Pilots are moderators, passengers are everyone else.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatUserList {
    pub pilots: Vec<String>,
    pub passengers: Vec<String>,
}

impl Encode for ChatUserList {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        let map = MapEncoder::new()
            .field("pilots", &self.pilots)?
            .field("passengers", &self.passengers)?
            .finish();
        enc.emit(map)
    }
}

impl Decode for ChatUserList {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        let reader = MapReader::new(value)?;
        Ok(Self {
            pilots: reader.optional("pilots")?.unwrap_or_default(),
            passengers: reader.optional("passengers")?.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{from_wire, to_wire};

    fn sample_message() -> ChatMessage {
        ChatMessage {
            id: "m1".to_string(),
            channel: "/live/123".to_string(),
            user_guid: "guid-1".to_string(),
            username: "pilot".to_string(),
            user_role: UserRole::Moderator,
            message: "hi :wave:".to_string(),
            emotes: Some(vec![Emote {
                code: "wave".to_string(),
                image: "/e/wave.png".to_string(),
            }]),
            success: None,
        }
    }

    #[test]
    fn test_chat_message_roundtrip() {
        let message = sample_message();
        let encoded = to_wire(&message).unwrap();
        let decoded: ChatMessage = from_wire(&encoded).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_chat_message_wire_keys() {
        let encoded = to_wire(&sample_message()).unwrap();
        // External casing: member user_guid encodes as key "userGUID"
        assert_eq!(encoded.get_str("userGUID"), Some("guid-1"));
        assert_eq!(encoded.get_str("userType"), Some("Moderator"));
        assert_eq!(encoded.get("success"), Some(&WireValue::Null));
    }

    #[test]
    fn test_chat_message_ignores_unknown_fields() {
        let mut encoded = to_wire(&sample_message()).unwrap();
        encoded
            .as_map_mut()
            .unwrap()
            .insert("futureField".to_string(), WireValue::Int(1));

        let decoded: ChatMessage = from_wire(&encoded).unwrap();
        assert_eq!(decoded, sample_message());
    }

    #[test]
    fn test_chat_message_rejects_wrong_shape() {
        let mut encoded = to_wire(&sample_message()).unwrap();
        encoded.as_map_mut().unwrap().remove("id");
        assert!(from_wire::<ChatMessage>(&encoded).is_err());

        assert!(from_wire::<ChatMessage>(&WireValue::Array(vec![])).is_err());
    }

    #[test]
    fn test_user_role_rejects_unknown() {
        let err = UserRole::decode(&WireValue::String("Admin".into()));
        assert!(matches!(err, Err(DecodeError::InvalidValue { .. })));
    }

    #[test]
    fn test_join_leave_roundtrip() {
        let join = JoinChatChannel {
            channel: "/live/123".to_string(),
        };
        let encoded = to_wire(&join).unwrap();
        assert_eq!(encoded.get_str("channel"), Some("/live/123"));

        let leave = LeaveChatChannel {
            channel: "/live/123".to_string(),
        };
        assert_eq!(
            LeaveChatChannel::URL,
            "/RadioMessage/leaveLivestreamRadioFrequency"
        );
        assert_eq!(to_wire(&leave).unwrap().get_str("channel"), Some("/live/123"));
    }

    #[test]
    fn test_send_chat_ack_shapes() {
        // Failure: bare reason string
        let ack = SendChatAck::decode(&WireValue::String("rate limited".into())).unwrap();
        assert!(!ack.success);
        assert_eq!(ack.reason.as_deref(), Some("rate limited"));

        // Success: echoed message object
        let echo = to_wire(&sample_message()).unwrap();
        let ack = SendChatAck::decode(&echo).unwrap();
        assert!(ack.success);
        assert_eq!(ack.reason, None);

        // Explicit failure object
        let wire = to_wire(
            &crate::wire::MapEncoder::new()
                .field("success", &false)
                .unwrap()
                .field("message", "invalid emote")
                .unwrap()
                .finish(),
        )
        .unwrap();
        let ack = SendChatAck::decode(&wire).unwrap();
        assert!(!ack.success);
        assert_eq!(ack.reason.as_deref(), Some("invalid emote"));
    }

    #[test]
    fn test_user_list_roundtrip() {
        let list = ChatUserList {
            pilots: vec!["mod1".to_string()],
            passengers: vec!["user1".to_string(), "user2".to_string()],
        };
        let encoded = to_wire(&list).unwrap();
        let decoded: ChatUserList = from_wire(&encoded).unwrap();
        assert_eq!(decoded, list);

        // Missing rosters decode as empty
        let empty: ChatUserList = from_wire(&WireValue::Map(Default::default())).unwrap();
        assert!(empty.pilots.is_empty());
        assert!(empty.passengers.is_empty());
    }
}
