//! Event schema registry
//!
//! The closed set of named events exchanged with the gateway. Request-style
//! events (expect an acknowledgement) each declare a constant HTTP-style
//! method and URL path; they are emitted under the lowercased method name
//! with a `{method, headers, url, data}` envelope, the gateway's request
//! convention. Push-style events arrive unsolicited under their own wire
//! names and resolve to exactly one payload variant via [`PushEvent`].

pub mod chat;
pub mod connect;
pub mod notification;
pub mod poll;
pub mod registry;

use std::collections::HashMap;

use crate::wire::{
    Decode, DecodeError, Encode, EncodeError, MapEncoder, MapReader, WireValue,
};

pub use chat::{
    ChatMessage, ChatUserList, Emote, GetChatUserList, JoinChatChannel, LeaveChatChannel,
    SendChatAck, SendChatMessage, UserRole,
};
pub use connect::SocketConnect;
pub use notification::{CreatorMenuUpdate, CreatorNotification, PostRelease};
pub use poll::{JoinPollRoom, LeavePollRoom, Poll, PollOpenClose, Tally, TallyUpdate};
pub use registry::PushEvent;

/// Push-only wire event names, case-sensitive
pub const PUSH_RADIO_CHATTER: &str = "radioChatter";
pub const PUSH_POLL_OPEN_CLOSE: &str = "pollOpenClose";
pub const PUSH_POLL_UPDATE_TALLY: &str = "pollUpdateTally";
pub const PUSH_CREATOR_NOTIFICATION: &str = "creatorNotification";
pub const PUSH_POST_RELEASE: &str = "postRelease";
pub const PUSH_CREATOR_MENU_UPDATE: &str = "creatorMenuUpdate";

/// HTTP-style method carried by request events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Lowercase wire rendering; doubles as the emit event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
        }
    }
}

/// A request-style event: fixed method, fixed URL, typed acknowledgement
///
/// All three constants are fixed per variant, never computed at runtime.
pub trait RequestEvent: Encode {
    const METHOD: Method;
    const URL: &'static str;

    /// Payload type carried by the acknowledgement body
    type Response: Decode;
}

/// Build the request envelope for an outgoing event
///
/// `{method, headers, url, data}`; headers are a string map, usually empty.
pub fn request_envelope<R: RequestEvent>(request: &R) -> Result<WireValue, EncodeError> {
    let envelope = MapEncoder::new()
        .field("method", R::METHOD.as_str())?
        .raw("headers", WireValue::Map(HashMap::new()))
        .field("url", R::URL)?
        .field("data", request)?
        .finish();
    Ok(envelope)
}

/// Acknowledgement envelope: `{statusCode, headers, body}`
///
/// Some gateway endpoints acknowledge with a bare body instead of the full
/// envelope; those decode as status 200.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub status_code: i64,
    pub body: WireValue,
}

impl ResponseEnvelope {
    /// Whether the gateway reported success
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Decode the body into the request's typed response
    pub fn decode_body<T: Decode>(&self) -> Result<T, DecodeError> {
        T::decode(&self.body)
    }
}

impl Decode for ResponseEnvelope {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        if let Ok(reader) = MapReader::new(value) {
            if reader.get("statusCode").is_some() {
                let status_code: i64 = reader.required("statusCode")?;
                let body = reader.get("body").cloned().unwrap_or(WireValue::Null);
                return Ok(Self { status_code, body });
            }
        }
        Ok(Self {
            status_code: 200,
            body: value.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::to_wire;

    #[test]
    fn test_request_envelope_shape() {
        let request = JoinChatChannel {
            channel: "/live/123".to_string(),
        };
        let envelope = request_envelope(&request).unwrap();

        assert_eq!(envelope.get_str("method"), Some("post"));
        assert_eq!(
            envelope.get_str("url"),
            Some("/RadioMessage/joinLivestreamRadioFrequency")
        );
        assert_eq!(
            envelope.get("headers"),
            Some(&WireValue::Map(Default::default()))
        );
        assert_eq!(
            envelope.get("data").and_then(|d| d.get_str("channel")),
            Some("/live/123")
        );
    }

    #[test]
    fn test_method_names() {
        assert_eq!(Method::Get.as_str(), "get");
        assert_eq!(Method::Post.as_str(), "post");
    }

    #[test]
    fn test_response_envelope_full() {
        let wire = to_wire(
            &MapEncoder::new()
                .field("statusCode", &404i64)
                .unwrap()
                .field("body", "not found")
                .unwrap()
                .finish(),
        )
        .unwrap();

        let envelope = ResponseEnvelope::decode(&wire).unwrap();
        assert_eq!(envelope.status_code, 404);
        assert!(!envelope.is_success());
        assert_eq!(envelope.body, WireValue::String("not found".into()));
    }

    #[test]
    fn test_response_envelope_bare_body() {
        let wire = WireValue::String("OK".into());
        let envelope = ResponseEnvelope::decode(&wire).unwrap();
        assert_eq!(envelope.status_code, 200);
        assert!(envelope.is_success());
        assert_eq!(envelope.decode_body::<String>().unwrap(), "OK");
    }
}
