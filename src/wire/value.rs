//! Wire value types
//!
//! The gateway's transport layer understands exactly one representation: a
//! recursive tree of null/bool/number/string/array/map. This enum is that
//! representation; every typed payload encodes into it and decodes out of it.

use std::collections::HashMap;

/// Unified wire value representation
///
/// Payloads are trees: encoding never produces a cyclic structure, and maps
/// are keyed by strings only.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// Null / absent value
    Null,

    /// Boolean value
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// IEEE 754 double-precision floating point
    Double(f64),

    /// UTF-8 string
    String(String),

    /// Ordered array, index-significant
    Array(Vec<WireValue>),

    /// Key-value map, string keys only
    Map(HashMap<String, WireValue>),
}

impl WireValue {
    /// Try to get this value as a string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            WireValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a double
    ///
    /// Integers widen losslessly.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            WireValue::Double(n) => Some(*n),
            WireValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            WireValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as a map reference
    pub fn as_map(&self) -> Option<&HashMap<String, WireValue>> {
        match self {
            WireValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get this value as a mutable map reference
    pub fn as_map_mut(&mut self) -> Option<&mut HashMap<String, WireValue>> {
        match self {
            WireValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get this value as an array reference
    pub fn as_array(&self) -> Option<&Vec<WireValue>> {
        match self {
            WireValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, WireValue::Null)
    }

    /// Get an entry from a map value
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.as_map()?.get(key)
    }

    /// Get a string entry from a map value
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Get an integer entry from a map value
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_i64()
    }

    /// Interpret an untyped scalar string the way the gateway encodes it
    ///
    /// Ordered policy for untyped slots: try boolean, then integer, then
    /// double, then fall back to string; the literal `null` becomes `Null`.
    /// First success wins. Typed fields never use this path.
    pub fn interpret(raw: &str) -> WireValue {
        match raw {
            "true" => return WireValue::Bool(true),
            "false" => return WireValue::Bool(false),
            "null" => return WireValue::Null,
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return WireValue::Int(i);
        }
        if let Ok(n) = raw.parse::<f64>() {
            return WireValue::Double(n);
        }
        WireValue::String(raw.to_string())
    }
}

impl Default for WireValue {
    fn default() -> Self {
        WireValue::Null
    }
}

impl From<bool> for WireValue {
    fn from(v: bool) -> Self {
        WireValue::Bool(v)
    }
}

impl From<i64> for WireValue {
    fn from(v: i64) -> Self {
        WireValue::Int(v)
    }
}

impl From<i32> for WireValue {
    fn from(v: i32) -> Self {
        WireValue::Int(v as i64)
    }
}

impl From<f64> for WireValue {
    fn from(v: f64) -> Self {
        WireValue::Double(v)
    }
}

impl From<String> for WireValue {
    fn from(v: String) -> Self {
        WireValue::String(v)
    }
}

impl From<&str> for WireValue {
    fn from(v: &str) -> Self {
        WireValue::String(v.to_string())
    }
}

impl<V: Into<WireValue>> From<Vec<V>> for WireValue {
    fn from(v: Vec<V>) -> Self {
        WireValue::Array(v.into_iter().map(|x| x.into()).collect())
    }
}

impl<V: Into<WireValue>> From<HashMap<String, V>> for WireValue {
    fn from(v: HashMap<String, V>) -> Self {
        WireValue::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<V: Into<WireValue>> From<Option<V>> for WireValue {
    fn from(v: Option<V>) -> Self {
        match v {
            Some(v) => v.into(),
            None => WireValue::Null,
        }
    }
}
