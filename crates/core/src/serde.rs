//! Serde helper functions for request body deserialization.
//!
//! Note content may arrive as a bare string, which is wrapped into a
//! one-element sequence. Any other shape is stored exactly as sent.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Wraps a bare string into a one-element sequence. Other values are kept as-is.
pub fn normalize_content(value: Value) -> Value {
    match value {
        Value::String(single) => Value::Array(vec![Value::String(single)]),
        other => other,
    }
}

/// Deserialize note content, wrapping a bare string into a sequence.
///
/// Sequences pass through unchanged, whatever their element types.
pub fn deserialize_content<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(normalize_content)
}

/// Deserialize optional note content, treating `null` as None.
pub fn deserialize_optional_content<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(value.map(normalize_content))
}
