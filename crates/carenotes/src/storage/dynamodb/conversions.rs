//! DynamoDB attribute conversion functions.
//!
//! Items are converted through `serde_json::Value`, so the stored attribute
//! names are exactly the camelCase names of the JSON representation.
//! These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use carenotes_core::patient::{Note, Patient};
use carenotes_core::storage::RepositoryError;
use serde_json::{Map, Number, Value};

/// Convert a JSON value to a DynamoDB attribute value.
pub fn json_to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => {
            AttributeValue::L(items.iter().map(json_to_attribute_value).collect())
        }
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(key, value)| (key.clone(), json_to_attribute_value(value)))
                .collect(),
        ),
    }
}

/// Convert a DynamoDB attribute value to a JSON value.
///
/// String and number sets become arrays. Binary attributes are never written
/// by this service and are rejected.
pub fn attribute_value_to_json(value: &AttributeValue) -> Result<Value, RepositoryError> {
    let json = match value {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => parse_number(n)?,
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::L(items) => Value::Array(
            items
                .iter()
                .map(attribute_value_to_json)
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(map) => Value::Object(item_to_json(map)?),
        AttributeValue::Ss(set) => Value::Array(set.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(set) => Value::Array(
            set.iter()
                .map(|n| parse_number(n))
                .collect::<Result<_, _>>()?,
        ),
        other => {
            return Err(RepositoryError::Serialization(format!(
                "Unsupported attribute value: {other:?}"
            )))
        }
    };

    Ok(json)
}

fn parse_number(raw: &str) -> Result<Value, RepositoryError> {
    if let Ok(int) = raw.parse::<i64>() {
        return Ok(Value::from(int));
    }
    if let Ok(uint) = raw.parse::<u64>() {
        return Ok(Value::from(uint));
    }

    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| RepositoryError::Serialization(format!("Invalid number attribute: {raw}")))
}

fn item_to_json(item: &HashMap<String, AttributeValue>) -> Result<Map<String, Value>, RepositoryError> {
    item.iter()
        .map(|(key, value)| Ok::<_, RepositoryError>((key.clone(), attribute_value_to_json(value)?)))
        .collect()
}

/// Convert a Patient to a DynamoDB item, notes included.
pub fn patient_to_item(patient: &Patient) -> Result<HashMap<String, AttributeValue>, RepositoryError> {
    match serde_json::to_value(patient) {
        Ok(Value::Object(map)) => Ok(map
            .iter()
            .map(|(key, value)| (key.clone(), json_to_attribute_value(value)))
            .collect()),
        Ok(other) => Err(RepositoryError::Serialization(format!(
            "Patient did not serialize to an object: {other}"
        ))),
        Err(e) => Err(RepositoryError::Serialization(e.to_string())),
    }
}

/// Convert a DynamoDB item to a Patient.
pub fn item_to_patient(item: &HashMap<String, AttributeValue>) -> Result<Patient, RepositoryError> {
    let map = item_to_json(item)?;
    serde_json::from_value(Value::Object(map))
        .map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Convert a note to a DynamoDB map attribute.
pub fn note_to_attribute_value(note: &Note) -> Result<AttributeValue, RepositoryError> {
    serde_json::to_value(note)
        .map(|value| json_to_attribute_value(&value))
        .map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Convert a notes sequence to a DynamoDB list attribute.
pub fn notes_to_attribute_value(notes: &[Note]) -> Result<AttributeValue, RepositoryError> {
    notes
        .iter()
        .map(note_to_attribute_value)
        .collect::<Result<Vec<_>, _>>()
        .map(AttributeValue::L)
}
