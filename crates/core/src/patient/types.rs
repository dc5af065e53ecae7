use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::serde::deserialize_content;

/// Discriminator stored in the `type` attribute of every record.
///
/// Patients use it as the second half of their composite key; notes carry it
/// as a plain attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    Patient,
    Note,
}

impl RecordType {
    /// Returns the literal stored in the `type` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Patient => "Patient",
            RecordType::Note => "Note",
        }
    }
}

/// A person to reach on behalf of the patient.
///
/// Only the common attributes are named; anything else the caller sent is
/// kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A clinical note embedded in its patient's `notes` sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique within the owning patient only.
    pub id: String,
    /// Back-reference to the owning patient. Never used for lookup.
    pub patient_id: String,
    pub author: String,
    /// Usually a sequence of strings; any other shape is kept as sent.
    #[serde(deserialize_with = "deserialize_content")]
    pub content: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub record_type: RecordType,
}

/// A patient row, keyed by (`id`, `type` = "Patient").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub name: String,
    pub email: String,
    pub date_of_birth: String,
    pub blood_type: String,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medical_history: Vec<String>,
    #[serde(default)]
    pub emergency_contacts: Vec<EmergencyContact>,
    #[serde(default)]
    pub current_medications: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Ordered by insertion; appends go to the end.
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Patient {
    /// Returns true if at least one note has been added to this patient.
    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn timestamp() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_record_type_literals() {
        assert_eq!(RecordType::Patient.as_str(), "Patient");
        assert_eq!(RecordType::Note.as_str(), "Note");
        assert_eq!(
            serde_json::to_value(RecordType::Patient).unwrap(),
            json!("Patient")
        );
    }

    #[test]
    fn test_patient_serializes_with_camel_case_and_type() {
        let patient = Patient {
            id: "p1".to_string(),
            record_type: RecordType::Patient,
            name: "A".to_string(),
            email: "a@a.com".to_string(),
            date_of_birth: "2000-01-01".to_string(),
            blood_type: "O+".to_string(),
            allergies: vec![],
            medical_history: vec![],
            emergency_contacts: vec![],
            current_medications: vec![],
            created_at: timestamp(),
            updated_at: timestamp(),
            notes: vec![],
        };

        let value = serde_json::to_value(&patient).unwrap();

        assert_eq!(value["type"], "Patient");
        assert_eq!(value["dateOfBirth"], "2000-01-01");
        assert_eq!(value["bloodType"], "O+");
        assert_eq!(value["notes"], json!([]));
        assert!(value.get("record_type").is_none());
    }

    #[test]
    fn test_patient_without_notes_attribute_deserializes_empty() {
        let value = json!({
            "id": "p1",
            "type": "Patient",
            "name": "A",
            "email": "a@a.com",
            "dateOfBirth": "2000-01-01",
            "bloodType": "O+",
            "createdAt": "2024-01-15T10:30:00Z",
            "updatedAt": "2024-01-15T10:30:00Z"
        });

        let patient: Patient = serde_json::from_value(value).unwrap();

        assert!(!patient.has_notes());
        assert!(patient.allergies.is_empty());
    }

    #[test]
    fn test_emergency_contact_keeps_unknown_attributes() {
        let value = json!({"name": "Bob", "phone": "555", "priority": 1});

        let contact: EmergencyContact = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(contact.name.as_deref(), Some("Bob"));
        assert_eq!(contact.extra.get("priority"), Some(&json!(1)));
        assert_eq!(serde_json::to_value(&contact).unwrap(), value);
    }

    #[test]
    fn test_stored_note_with_string_content_is_normalized() {
        let value = json!({
            "id": "Note#1",
            "patientId": "p1",
            "author": "Dr.Who",
            "content": "legacy",
            "createdAt": "2024-01-15T10:30:00Z",
            "updatedAt": "2024-01-15T10:30:00Z",
            "type": "Note"
        });

        let note: Note = serde_json::from_value(value).unwrap();

        assert_eq!(note.content, json!(["legacy"]));
        assert_eq!(note.record_type, RecordType::Note);
    }
}
