//! JSON interop
//!
//! Concrete transports frame wire payloads as JSON. The conversion is
//! lossless in the JSON→wire direction; wire→JSON maps non-finite doubles to
//! `null`, which JSON cannot represent.

use serde_json::Value as JsonValue;

use super::value::WireValue;

/// Convert a wire value into a JSON value
pub fn to_json(value: &WireValue) -> JsonValue {
    match value {
        WireValue::Null => JsonValue::Null,
        WireValue::Bool(b) => JsonValue::Bool(*b),
        WireValue::Int(i) => JsonValue::Number((*i).into()),
        WireValue::Double(n) => serde_json::Number::from_f64(*n)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        WireValue::String(s) => JsonValue::String(s.clone()),
        WireValue::Array(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        WireValue::Map(entries) => JsonValue::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect(),
        ),
    }
}

/// Convert a JSON value into a wire value
///
/// Integral JSON numbers become `Int`; everything else numeric becomes
/// `Double`.
pub fn from_json(value: &JsonValue) -> WireValue {
    match value {
        JsonValue::Null => WireValue::Null,
        JsonValue::Bool(b) => WireValue::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                WireValue::Int(i)
            } else {
                WireValue::Double(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::String(s) => WireValue::String(s.clone()),
        JsonValue::Array(items) => WireValue::Array(items.iter().map(from_json).collect()),
        JsonValue::Object(entries) => WireValue::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), from_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_wire() {
        let json = json!({
            "channel": "/live/123",
            "tick": 4,
            "ratio": 0.5,
            "open": true,
            "counts": [1, 2, 3],
            "missing": null,
        });

        let wire = from_json(&json);
        assert_eq!(wire.get_str("channel"), Some("/live/123"));
        assert_eq!(wire.get_i64("tick"), Some(4));
        assert_eq!(wire.get("ratio").and_then(|v| v.as_f64()), Some(0.5));
        assert_eq!(wire.get("open").and_then(|v| v.as_bool()), Some(true));
        assert!(wire.get("missing").unwrap().is_null());
        assert_eq!(
            wire.get("counts"),
            Some(&WireValue::Array(vec![
                WireValue::Int(1),
                WireValue::Int(2),
                WireValue::Int(3)
            ]))
        );
    }

    #[test]
    fn test_roundtrip_through_json() {
        let json = json!({
            "poll": {
                "id": "p1",
                "options": ["a", "b"],
                "runningTally": { "tick": 0, "counts": [0, 0] },
            }
        });

        let wire = from_json(&json);
        let back = to_json(&wire);
        assert_eq!(json, back);
    }

    #[test]
    fn test_non_finite_double_becomes_null() {
        assert_eq!(to_json(&WireValue::Double(f64::NAN)), JsonValue::Null);
    }
}
