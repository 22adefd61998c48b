//! Gateway timestamp handling
//!
//! The gateway performs no timezone negotiation: every timestamp on the wire
//! is an ISO-8601 string with fractional seconds and an explicit offset
//! (`yyyy-MM-dd'T'HH:mm:ss.SSSZ`). Encoding always produces exactly that
//! format in UTC; parsing additionally accepts an RFC 3339 `Z` suffix, which
//! some gateway endpoints emit.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

use super::decode::{Decode, DecodeError};
use super::encode::{Encode, EncodeError, Encoder};
use super::value::WireValue;

/// Chrono format string for the gateway's wire representation
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// A timestamp exchanged with the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WireDate(pub DateTime<Utc>);

impl WireDate {
    /// Current instant
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Construct from milliseconds since the Unix epoch
    pub fn from_timestamp_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Render in the gateway's exact wire format
    pub fn to_wire_string(&self) -> String {
        self.0.format(WIRE_FORMAT).to_string()
    }

    /// Parse a gateway timestamp string
    ///
    /// Accepts the wire format (`2023-06-01T12:00:00.000+0000`) and
    /// RFC 3339 (`2023-06-01T12:00:00.000Z`).
    pub fn parse(raw: &str) -> Result<Self, DecodeError> {
        if let Ok(dt) = DateTime::parse_from_str(raw, WIRE_FORMAT) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|_| DecodeError::BadTimestamp(raw.to_string()))
    }

    /// RFC 3339 rendering, for logs and collaborators outside the gateway
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl From<DateTime<Utc>> for WireDate {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl Encode for WireDate {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        enc.emit(self.to_wire_string())
    }
}

impl Decode for WireDate {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        let raw = String::decode(value)?;
        Self::parse(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::encode::to_wire;

    fn sample() -> WireDate {
        WireDate::from_timestamp_millis(1_685_620_800_123).unwrap()
    }

    #[test]
    fn test_wire_format_exact() {
        let date = sample();
        let s = date.to_wire_string();
        // 2023-06-01T12:00:00.123+0000, fractional seconds with RFC 822 zone
        assert_eq!(s, "2023-06-01T12:00:00.123+0000");
    }

    #[test]
    fn test_parse_wire_format() {
        let parsed = WireDate::parse("2023-06-01T12:00:00.123+0000").unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_parse_rfc3339_z_suffix() {
        let parsed = WireDate::parse("2023-06-01T12:00:00.123Z").unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            WireDate::parse("June 1st"),
            Err(DecodeError::BadTimestamp(_))
        ));
    }

    #[test]
    fn test_roundtrip_through_wire() {
        let date = sample();
        let encoded = to_wire(&date).unwrap();
        assert_eq!(
            encoded,
            WireValue::String("2023-06-01T12:00:00.123+0000".into())
        );
        let decoded = WireDate::decode(&encoded).unwrap();
        assert_eq!(decoded, date);
    }

    #[test]
    fn test_non_utc_offset_normalizes() {
        let parsed = WireDate::parse("2023-06-01T14:00:00.123+0200").unwrap();
        assert_eq!(parsed, sample());
    }
}
