//! Typed payload decoding
//!
//! Incoming wire values decode into payload structures through [`Decode`].
//! Decoding is type-directed: each field is interpreted according to its
//! declared Rust type, with narrow coercions for the gateway's untyped
//! JSON-like encoding (a wire string `"true"` decodes into a boolean field,
//! but stays a string for a string field). Unrecognized map keys are ignored
//! for forward compatibility; a required field that fails every
//! interpretation attempt is a [`DecodeError`].

use std::collections::HashMap;

use thiserror::Error;

use super::value::WireValue;

/// Errors raised while decoding an incoming wire value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A keyed payload was expected but the value is not a map
    #[error("expected map, found {found}")]
    NotAMap { found: &'static str },

    /// The value's shape does not match the target type
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: String,
    },

    /// A required field is missing from the payload
    #[error("missing field `{0}`")]
    MissingField(String),

    /// An enum-like field carries a value outside its closed set
    #[error("invalid value `{value}` for {field}")]
    InvalidValue { field: &'static str, value: String },

    /// A push event name outside the registered set
    #[error("unknown event `{0}`")]
    UnknownEvent(String),

    /// A timestamp string that matches no accepted format
    #[error("unparseable timestamp `{0}`")]
    BadTimestamp(String),
}

fn type_name(value: &WireValue) -> &'static str {
    match value {
        WireValue::Null => "null",
        WireValue::Bool(_) => "bool",
        WireValue::Int(_) => "int",
        WireValue::Double(_) => "double",
        WireValue::String(_) => "string",
        WireValue::Array(_) => "array",
        WireValue::Map(_) => "map",
    }
}

fn mismatch(expected: &'static str, found: &WireValue) -> DecodeError {
    DecodeError::Mismatch {
        expected,
        found: format!("{:?}", found),
    }
}

/// Conversion of a wire value into a payload structure
pub trait Decode: Sized {
    fn decode(value: &WireValue) -> Result<Self, DecodeError>;
}

/// Convenience function to decode a wire value into a payload
pub fn from_wire<T: Decode>(value: &WireValue) -> Result<T, DecodeError> {
    T::decode(value)
}

impl Decode for bool {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Bool(b) => Ok(*b),
            WireValue::Int(0) => Ok(false),
            WireValue::Int(1) => Ok(true),
            WireValue::String(s) if s == "true" => Ok(true),
            WireValue::String(s) if s == "false" => Ok(false),
            other => Err(mismatch("bool", other)),
        }
    }
}

impl Decode for i64 {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Int(i) => Ok(*i),
            WireValue::Double(n) if n.fract() == 0.0 => Ok(*n as i64),
            WireValue::String(s) => s.parse().map_err(|_| mismatch("int", value)),
            other => Err(mismatch("int", other)),
        }
    }
}

impl Decode for f64 {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Double(n) => Ok(*n),
            WireValue::Int(i) => Ok(*i as f64),
            WireValue::String(s) => s.parse().map_err(|_| mismatch("double", value)),
            other => Err(mismatch("double", other)),
        }
    }
}

impl Decode for String {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::String(s) => Ok(s.clone()),
            other => Err(mismatch("string", other)),
        }
    }
}

impl Decode for WireValue {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        Ok(value.clone())
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Null => Ok(None),
            other => T::decode(other).map(Some),
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Array(items) => items.iter().map(T::decode).collect(),
            other => Err(mismatch("array", other)),
        }
    }
}

impl<T: Decode> Decode for HashMap<String, T> {
    fn decode(value: &WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Map(entries) => entries
                .iter()
                .map(|(k, v)| Ok((k.clone(), T::decode(v)?)))
                .collect(),
            other => Err(mismatch("map", other)),
        }
    }
}

/// Keyed decoding helper over a wire map
///
/// Keys not consumed by the caller are ignored, which keeps decoding
/// forward-compatible with new gateway fields.
pub struct MapReader<'a> {
    map: &'a HashMap<String, WireValue>,
}

impl<'a> MapReader<'a> {
    /// Borrow a reader over a map value
    pub fn new(value: &'a WireValue) -> Result<Self, DecodeError> {
        match value {
            WireValue::Map(map) => Ok(Self { map }),
            other => Err(DecodeError::NotAMap {
                found: type_name(other),
            }),
        }
    }

    /// Decode a required field
    pub fn required<T: Decode>(&self, key: &str) -> Result<T, DecodeError> {
        let value = self
            .map
            .get(key)
            .ok_or_else(|| DecodeError::MissingField(key.to_string()))?;
        T::decode(value)
    }

    /// Decode an optional field; missing and `Null` both map to `None`
    pub fn optional<T: Decode>(&self, key: &str) -> Result<Option<T>, DecodeError> {
        match self.map.get(key) {
            None | Some(WireValue::Null) => Ok(None),
            Some(value) => T::decode(value).map(Some),
        }
    }

    /// Raw access to a field, if present
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.map.get(key)
    }
}
