//! DynamoDB key and attribute names.
//!
//! Pure functions with no side effects.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use carenotes_core::patient::RecordType;

/// Partition key attribute.
pub const ID_ATTRIBUTE: &str = "id";
/// Sort key attribute. Always `Patient` for patient rows.
pub const TYPE_ATTRIBUTE: &str = "type";
/// Embedded list of notes.
pub const NOTES_ATTRIBUTE: &str = "notes";
/// Last-modification timestamp.
pub const UPDATED_AT_ATTRIBUTE: &str = "updatedAt";

/// Generate the composite key of a patient row.
///
/// Pattern: `{ id: <patient_id>, type: "Patient" }`
pub fn patient_key(patient_id: &str) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            ID_ATTRIBUTE.to_string(),
            AttributeValue::S(patient_id.to_string()),
        ),
        (
            TYPE_ATTRIBUTE.to_string(),
            AttributeValue::S(RecordType::Patient.as_str().to_string()),
        ),
    ])
}
