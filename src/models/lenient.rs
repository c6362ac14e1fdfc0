// src/models/lenient.rs

//! `deserialize_with` helpers for fields that hand-edited or legacy documents
//! and loose clients fill with the wrong JSON type.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Renders any JSON value as text: `null` is empty, strings are kept, other
/// values use their JSON form.
pub fn text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// A string field that accepts any JSON value. See [`text`].
pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(text)
}

/// An optional string field: `null` is absent, anything else goes through [`text`].
pub fn opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(text(other)),
    })
}

/// A list field: anything but an array reads as empty.
pub fn list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Loose {
        #[serde(default, deserialize_with = "string")]
        name: String,
        #[serde(default, deserialize_with = "opt_string")]
        note: Option<String>,
        #[serde(default, deserialize_with = "list")]
        items: Vec<Value>,
    }

    #[test]
    fn wrong_types_are_coerced() {
        let loose: Loose =
            serde_json::from_value(json!({"name": 42, "note": null, "items": "nope"})).unwrap();

        assert_eq!(loose.name, "42");
        assert_eq!(loose.note, None);
        assert!(loose.items.is_empty());
    }

    #[test]
    fn missing_and_null_fields_default() {
        let loose: Loose = serde_json::from_value(json!({"name": null, "note": true})).unwrap();

        assert_eq!(loose.name, "");
        assert_eq!(loose.note.as_deref(), Some("true"));
        assert!(loose.items.is_empty());
    }
}
