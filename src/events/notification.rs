//! Creator and post notification events
//!
//! These pushes are decoded here and forwarded to the surrounding
//! application's notification collaborator unchanged; the client performs no
//! processing on them beyond schema resolution.

use crate::wire::{
    Decode, DecodeError, Encode, EncodeError, Encoder, MapEncoder, MapReader, WireValue,
};

/// `creatorNotification` push payload
#[derive(Debug, Clone, PartialEq)]
pub struct CreatorNotification {
    pub creator_id: String,
    pub title: Option<String>,
    pub message: Option<String>,
}

impl Encode for CreatorNotification {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        let map = MapEncoder::new()
            .field("creator", &self.creator_id)?
            .optional("title", &self.title)?
            .optional("message", &self.message)?
            .finish();
        enc.emit(map)
    }
}

impl Decode for CreatorNotification {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        let reader = MapReader::new(value)?;
        Ok(Self {
            creator_id: reader.required("creator")?,
            title: reader.optional("title")?,
            message: reader.optional("message")?,
        })
    }
}

/// `postRelease` push payload: a creator published a new post
#[derive(Debug, Clone, PartialEq)]
pub struct PostRelease {
    pub id: String,
    pub creator_id: String,
    pub title: String,
    pub text: Option<String>,
    /// Thumbnail path, when the post carries one
    pub icon: Option<String>,
}

impl Encode for PostRelease {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        let map = MapEncoder::new()
            .field("id", &self.id)?
            .field("creator", &self.creator_id)?
            .field("title", &self.title)?
            .optional("text", &self.text)?
            .optional("icon", &self.icon)?
            .finish();
        enc.emit(map)
    }
}

impl Decode for PostRelease {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        let reader = MapReader::new(value)?;
        Ok(Self {
            id: reader.required("id")?,
            creator_id: reader.required("creator")?,
            title: reader.required("title")?,
            text: reader.optional("text")?,
            icon: reader.optional("icon")?,
        })
    }
}

/// `creatorMenuUpdate` push payload
///
/// The menu body is gateway-defined and consumed opaquely downstream, so it
/// stays a raw wire value.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatorMenuUpdate {
    pub creator_id: String,
    pub menu: WireValue,
}

impl Encode for CreatorMenuUpdate {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        let map = MapEncoder::new()
            .field("creator", &self.creator_id)?
            .field("menu", &self.menu)?
            .finish();
        enc.emit(map)
    }
}

impl Decode for CreatorMenuUpdate {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        let reader = MapReader::new(value)?;
        Ok(Self {
            creator_id: reader.required("creator")?,
            menu: reader.get("menu").cloned().unwrap_or(WireValue::Null),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{from_wire, to_wire};

    #[test]
    fn test_creator_notification_roundtrip() {
        let event = CreatorNotification {
            creator_id: "creator-1".to_string(),
            title: Some("Going live".to_string()),
            message: None,
        };
        let encoded = to_wire(&event).unwrap();
        assert_eq!(encoded.get_str("creator"), Some("creator-1"));
        let decoded: CreatorNotification = from_wire(&encoded).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_post_release_roundtrip() {
        let event = PostRelease {
            id: "post-9".to_string(),
            creator_id: "creator-1".to_string(),
            title: "New video".to_string(),
            text: Some("It's here".to_string()),
            icon: Some("/thumb/9.png".to_string()),
        };
        let encoded = to_wire(&event).unwrap();
        let decoded: PostRelease = from_wire(&encoded).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_menu_update_keeps_raw_body() {
        let event = CreatorMenuUpdate {
            creator_id: "creator-1".to_string(),
            menu: WireValue::Array(vec![WireValue::String("lineup".into())]),
        };
        let encoded = to_wire(&event).unwrap();
        let decoded: CreatorMenuUpdate = from_wire(&encoded).unwrap();
        assert_eq!(decoded, event);
    }
}
