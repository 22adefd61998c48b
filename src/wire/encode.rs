//! Typed payload encoding
//!
//! Outgoing event payloads implement [`Encode`] and are lowered into a
//! [`WireValue`] tree through an [`Encoder`]. The encoder owns a single
//! top-level value slot: encoding a second top-level value into an already
//! populated slot is a programmer error and fails that operation only.
//!
//! Keyed encoding goes through [`MapEncoder`], which takes the field's wire
//! name explicitly. This is where external casing conventions are applied
//! (member `creator_id` encodes as key `"creatorId"`).

use std::collections::HashMap;

use thiserror::Error;

use super::value::WireValue;

/// Errors raised while encoding an outgoing payload
///
/// All variants are programmer errors, fatal to the operation that raised
/// them and to nothing else.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A second top-level value was encoded into an occupied slot
    #[error("single-value slot already populated")]
    SlotOccupied,

    /// `finish` was called before any value was encoded
    #[error("no value encoded")]
    Empty,
}

/// Conversion of a payload structure into its wire representation
pub trait Encode {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError>;
}

/// Encoding context with a single top-level value slot
pub struct Encoder {
    slot: Option<WireValue>,
}

impl Encoder {
    /// Create a new, empty encoder
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Store the top-level value for this encode context
    ///
    /// Fails with [`EncodeError::SlotOccupied`] if a value was already
    /// stored.
    pub fn emit(&mut self, value: impl Into<WireValue>) -> Result<(), EncodeError> {
        if self.slot.is_some() {
            return Err(EncodeError::SlotOccupied);
        }
        self.slot = Some(value.into());
        Ok(())
    }

    /// Consume the encoder, yielding the encoded value
    pub fn finish(self) -> Result<WireValue, EncodeError> {
        self.slot.ok_or(EncodeError::Empty)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyed encoding helper producing a wire map
///
/// Field order is not significant on the wire; keys are the exact wire
/// names, case-sensitive.
pub struct MapEncoder {
    entries: HashMap<String, WireValue>,
}

impl MapEncoder {
    /// Create an empty map encoder
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Encode a required field under its wire name
    pub fn field<T: Encode + ?Sized>(mut self, key: &str, value: &T) -> Result<Self, EncodeError> {
        self.entries.insert(key.to_string(), to_wire(value)?);
        Ok(self)
    }

    /// Encode an optional field; `None` encodes as wire `Null`
    ///
    /// Omitted-vs-null is not distinguished once on the wire.
    pub fn optional<T: Encode>(
        mut self,
        key: &str,
        value: &Option<T>,
    ) -> Result<Self, EncodeError> {
        let encoded = match value {
            Some(v) => to_wire(v)?,
            None => WireValue::Null,
        };
        self.entries.insert(key.to_string(), encoded);
        Ok(self)
    }

    /// Insert an already-lowered wire value
    pub fn raw(mut self, key: &str, value: WireValue) -> Self {
        self.entries.insert(key.to_string(), value);
        self
    }

    /// Finish the map
    pub fn finish(self) -> WireValue {
        WireValue::Map(self.entries)
    }
}

impl Default for MapEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to encode a payload into a wire value
pub fn to_wire<T: Encode + ?Sized>(value: &T) -> Result<WireValue, EncodeError> {
    let mut enc = Encoder::new();
    value.encode(&mut enc)?;
    enc.finish()
}

impl Encode for bool {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        enc.emit(*self)
    }
}

impl Encode for i64 {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        enc.emit(*self)
    }
}

impl Encode for f64 {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        enc.emit(*self)
    }
}

impl Encode for String {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        enc.emit(self.as_str())
    }
}

impl Encode for str {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        enc.emit(self)
    }
}

impl Encode for WireValue {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        enc.emit(self.clone())
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        match self {
            Some(v) => v.encode(enc),
            None => enc.emit(WireValue::Null),
        }
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        let mut items = Vec::with_capacity(self.len());
        for item in self {
            items.push(to_wire(item)?);
        }
        enc.emit(WireValue::Array(items))
    }
}

impl<T: Encode> Encode for HashMap<String, T> {
    fn encode(&self, enc: &mut Encoder) -> Result<(), EncodeError> {
        let mut map = HashMap::with_capacity(self.len());
        for (key, value) in self {
            map.insert(key.clone(), to_wire(value)?);
        }
        enc.emit(WireValue::Map(map))
    }
}
