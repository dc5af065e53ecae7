//! Update expression builders.
//!
//! Every attribute name goes through an expression attribute name
//! (`#name`), since several patient attributes (`name`, `type`) are
//! DynamoDB reserved words. Every update is conditioned on the row existing.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use carenotes_core::patient::{Note, UpdatePatientRequest};
use carenotes_core::storage::RepositoryError;
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::conversions::{json_to_attribute_value, note_to_attribute_value, notes_to_attribute_value};
use super::keys::{ID_ATTRIBUTE, NOTES_ATTRIBUTE, UPDATED_AT_ATTRIBUTE};

/// Condition that turns an upsert into an update of an existing row.
pub const ROW_EXISTS_CONDITION: &str = "attribute_exists(#id)";

/// The pieces of a conditional `UpdateItem` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalUpdate {
    pub update_expression: String,
    pub condition_expression: &'static str,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl ConditionalUpdate {
    fn new(update_expression: String) -> Self {
        Self {
            update_expression,
            condition_expression: ROW_EXISTS_CONDITION,
            names: HashMap::from([(format!("#{ID_ATTRIBUTE}"), ID_ATTRIBUTE.to_string())]),
            values: HashMap::new(),
        }
    }

    fn name(mut self, attribute: &str) -> Self {
        self.names
            .insert(format!("#{attribute}"), attribute.to_string());
        self
    }

    fn value(mut self, placeholder: &str, value: AttributeValue) -> Self {
        self.values.insert(placeholder.to_string(), value);
        self
    }
}

/// `SET #a = :a, ...` over the supplied fields plus `updatedAt`.
pub fn patient_update(
    changes: &UpdatePatientRequest,
    updated_at: DateTime<Utc>,
) -> Result<ConditionalUpdate, RepositoryError> {
    let Value::Object(mut fields) = serde_json::to_value(changes)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?
    else {
        return Err(RepositoryError::Serialization(
            "Update payload did not serialize to an object".to_string(),
        ));
    };
    let updated_at = serde_json::to_value(updated_at)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    fields.insert(UPDATED_AT_ATTRIBUTE.to_string(), updated_at);

    let assignments: Vec<String> = fields
        .keys()
        .map(|attribute| format!("#{attribute} = :{attribute}"))
        .collect();

    let update = fields.iter().fold(
        ConditionalUpdate::new(format!("SET {}", assignments.join(", "))),
        |update, (attribute, value)| {
            update
                .name(attribute)
                .value(&format!(":{attribute}"), json_to_attribute_value(value))
        },
    );

    Ok(update)
}

/// Appends one note, creating the list if the attribute is absent.
pub fn append_note_update(note: &Note) -> Result<ConditionalUpdate, RepositoryError> {
    let note = note_to_attribute_value(note)?;

    Ok(ConditionalUpdate::new(format!(
        "SET #{NOTES_ATTRIBUTE} = list_append(if_not_exists(#{NOTES_ATTRIBUTE}, :empty_list), :note)"
    ))
    .name(NOTES_ATTRIBUTE)
    .value(":empty_list", AttributeValue::L(Vec::new()))
    .value(":note", AttributeValue::L(vec![note])))
}

/// Overwrites the whole notes list.
pub fn replace_notes_update(notes: &[Note]) -> Result<ConditionalUpdate, RepositoryError> {
    let notes = notes_to_attribute_value(notes)?;

    Ok(
        ConditionalUpdate::new(format!("SET #{NOTES_ATTRIBUTE} = :notes"))
            .name(NOTES_ATTRIBUTE)
            .value(":notes", notes),
    )
}
