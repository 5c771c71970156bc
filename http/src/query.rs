//! Query-string flattening
//!
//! Request data is a JSON object. For `GET` requests it is flattened into
//! query pairs the way browser HTTP clients serialize params:
//!
//! - `null` values are skipped
//! - arrays repeat the key with a `[]` suffix, one pair per non-null element
//! - nested objects are sent as their JSON text
//! - strings are sent raw, numbers and booleans as their JSON text

use serde_json::{Map, Value};

/// Flatten a JSON object into ordered query pairs
#[must_use]
pub fn flatten(data: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(data.len());

    for (key, value) in data {
        match value {
            Value::Null => {},
            Value::Array(items) => {
                let key = format!("{key}[]");
                pairs.extend(
                    items
                        .iter()
                        .filter_map(scalar)
                        .map(|item| (key.clone(), item)),
                );
            },
            other => {
                if let Some(text) = scalar(other) {
                    pairs.push((key.clone(), text));
                }
            },
        }
    }

    pairs
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
