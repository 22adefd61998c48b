//! Wire codec
//!
//! The gateway speaks a loosely-typed, JSON-like representation. This module
//! provides the unified [`WireValue`] tree plus the typed encode/decode layer
//! that converts event payload structures to and from it.
//!
//! Encoding is explicit: each payload implements [`Encode`] against a keyed
//! or single-value context. Decoding is type-directed: each field decodes
//! according to its declared Rust type, with narrow scalar coercions to match
//! the gateway's untyped encoding. The ordered untyped fallback
//! (bool, then integer, then double, then string, then null) lives in
//! [`WireValue::interpret`].

pub mod decode;
pub mod encode;
pub mod json;
pub mod time;
pub mod value;

pub use decode::{from_wire, Decode, DecodeError, MapReader};
pub use encode::{to_wire, Encode, EncodeError, Encoder, MapEncoder};
pub use json::{from_json, to_json};
pub use time::WireDate;
pub use value::WireValue;
