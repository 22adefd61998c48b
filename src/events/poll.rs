//! Poll room events
//!
//! Poll rooms are creator-scoped, a separate membership namespace from chat
//! channels. A joined room delivers the poll lifecycle: `pollOpenClose`
//! (shared shape for both transitions), then `pollUpdateTally` pushes whose
//! `tick` versions the running tally. Out-of-order tally delivery must never
//! regress the stored state, so ticks are compared strictly.

use crate::wire::{
    Decode, DecodeError, Encode, EncodeError, Encoder, MapEncoder, MapReader, WireDate, WireValue,
};

use super::{Method, RequestEvent};

/// Running tally for a poll, versioned by a monotonic tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub tick: i64,
    /// Count per option, same order and length as the poll's option list
    pub counts: Vec<i64>,
}

impl Encode for Tally {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        let map = MapEncoder::new()
            .field("tick", &self.tick)?
            .field("counts", &self.counts)?
            .finish();
        enc.emit(map)
    }
}

impl Decode for Tally {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        let reader = MapReader::new(value)?;
        Ok(Self {
            tick: reader.required("tick")?,
            counts: reader.required("counts")?,
        })
    }
}

/// A live poll
#[derive(Debug, Clone, PartialEq)]
pub struct Poll {
    pub id: String,
    /// Creator whose poll room carries this poll
    pub creator_id: String,
    pub title: String,
    /// Ordered, index-significant option list
    pub options: Vec<String>,
    pub start_date: WireDate,
    pub end_date: WireDate,
    /// Tally at the time the event was emitted, if any
    pub running_tally: Option<Tally>,
}

impl Encode for Poll {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        let map = MapEncoder::new()
            .field("id", &self.id)?
            .field("creator", &self.creator_id)?
            .field("title", &self.title)?
            .field("options", &self.options)?
            .field("startDate", &self.start_date)?
            .field("endDate", &self.end_date)?
            .optional("runningTally", &self.running_tally)?
            .finish();
        enc.emit(map)
    }
}

impl Decode for Poll {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        let reader = MapReader::new(value)?;
        Ok(Self {
            id: reader.required("id")?,
            creator_id: reader.required("creator")?,
            title: reader.required("title")?,
            options: reader.required("options")?,
            start_date: reader.required("startDate")?,
            end_date: reader.required("endDate")?,
            running_tally: reader.optional("runningTally")?,
        })
    }
}

/// `pollOpenClose` push payload
///
/// Open and close share this shape; which transition it is falls out of
/// whether the poll id is already tracked.
#[derive(Debug, Clone, PartialEq)]
pub struct PollOpenClose {
    pub poll: Poll,
}

impl Encode for PollOpenClose {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        enc.emit(MapEncoder::new().field("poll", &self.poll)?.finish())
    }
}

impl Decode for PollOpenClose {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        let reader = MapReader::new(value)?;
        match reader.optional("poll")? {
            Some(poll) => Ok(Self { poll }),
            // Some gateway versions push the poll object bare
            None => Ok(Self {
                poll: Poll::decode(value)?,
            }),
        }
    }
}

/// `pollUpdateTally` push payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyUpdate {
    pub poll_id: String,
    pub tick: i64,
    pub counts: Vec<i64>,
}

impl TallyUpdate {
    /// View of the update as a tally
    pub fn tally(&self) -> Tally {
        Tally {
            tick: self.tick,
            counts: self.counts.clone(),
        }
    }
}

impl Encode for TallyUpdate {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        let map = MapEncoder::new()
            .field("pollId", &self.poll_id)?
            .field("tick", &self.tick)?
            .field("counts", &self.counts)?
            .finish();
        enc.emit(map)
    }
}

impl Decode for TallyUpdate {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        let reader = MapReader::new(value)?;
        Ok(Self {
            poll_id: reader.required("pollId")?,
            tick: reader.required("tick")?,
            counts: reader.required("counts")?,
        })
    }
}

/// Join a creator's poll room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPollRoom {
    pub creator_id: String,
}

impl Encode for JoinPollRoom {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        // Member creator_id, wire key "creatorId"
        enc.emit(
            MapEncoder::new()
                .field("creatorId", &self.creator_id)?
                .finish(),
        )
    }
}

impl RequestEvent for JoinPollRoom {
    const METHOD: Method = Method::Post;
    const URL: &'static str = "/api/v3/poll/live/joinroom";

    type Response = WireValue;
}

/// Leave a creator's poll room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeavePollRoom {
    pub creator_id: String,
}

impl Encode for LeavePollRoom {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        enc.emit(
            MapEncoder::new()
                .field("creatorId", &self.creator_id)?
                .finish(),
        )
    }
}

impl RequestEvent for LeavePollRoom {
    const METHOD: Method = Method::Post;
    const URL: &'static str = "/api/v3/poll/live/leaveroom";

    type Response = WireValue;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{from_wire, to_wire};

    fn sample_poll() -> Poll {
        Poll {
            id: "p1".to_string(),
            creator_id: "creator-1".to_string(),
            title: "Favorite color?".to_string(),
            options: vec!["red".to_string(), "blue".to_string()],
            start_date: WireDate::from_timestamp_millis(1_685_620_800_000).unwrap(),
            end_date: WireDate::from_timestamp_millis(1_685_620_860_000).unwrap(),
            running_tally: Some(Tally {
                tick: 0,
                counts: vec![0, 0],
            }),
        }
    }

    #[test]
    fn test_poll_roundtrip() {
        let poll = sample_poll();
        let encoded = to_wire(&poll).unwrap();
        let decoded: Poll = from_wire(&encoded).unwrap();
        assert_eq!(decoded, poll);
    }

    #[test]
    fn test_poll_wire_keys() {
        let encoded = to_wire(&sample_poll()).unwrap();
        assert_eq!(encoded.get_str("creator"), Some("creator-1"));
        assert_eq!(
            encoded.get_str("startDate"),
            Some("2023-06-01T12:00:00.000+0000")
        );
        let tally = encoded.get("runningTally").unwrap();
        assert_eq!(tally.get_i64("tick"), Some(0));
    }

    #[test]
    fn test_open_close_envelope_and_bare() {
        let event = PollOpenClose {
            poll: sample_poll(),
        };
        let encoded = to_wire(&event).unwrap();
        let decoded: PollOpenClose = from_wire(&encoded).unwrap();
        assert_eq!(decoded, event);

        // Bare poll object, no "poll" wrapper
        let bare = to_wire(&sample_poll()).unwrap();
        let decoded: PollOpenClose = from_wire(&bare).unwrap();
        assert_eq!(decoded.poll, sample_poll());
    }

    #[test]
    fn test_tally_update_roundtrip() {
        let update = TallyUpdate {
            poll_id: "p1".to_string(),
            tick: 3,
            counts: vec![5, 7],
        };
        let encoded = to_wire(&update).unwrap();
        assert_eq!(encoded.get_str("pollId"), Some("p1"));
        let decoded: TallyUpdate = from_wire(&encoded).unwrap();
        assert_eq!(decoded, update);
        assert_eq!(decoded.tally().counts, vec![5, 7]);
    }

    #[test]
    fn test_join_poll_room_casing_override() {
        let join = JoinPollRoom {
            creator_id: "creator-1".to_string(),
        };
        let encoded = to_wire(&join).unwrap();
        assert_eq!(encoded.get_str("creatorId"), Some("creator-1"));
        assert_eq!(JoinPollRoom::URL, "/api/v3/poll/live/joinroom");
        assert_eq!(LeavePollRoom::URL, "/api/v3/poll/live/leaveroom");
    }
}
