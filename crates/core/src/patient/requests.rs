//! Request payloads for patient and note operations.
//!
//! Following the Functional Core pattern, these are pure data types with no I/O.
//! Timestamps are passed in by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::serde::{deserialize_optional_content, normalize_content};

use super::error::NoteError;
use super::operations::generate_note_id;
use super::types::{EmergencyContact, Note, Patient, RecordType};

/// Request payload for creating a patient.
///
/// Every field is required; a missing one fails deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub date_of_birth: String,
    pub blood_type: String,
    pub allergies: Vec<String>,
    pub medical_history: Vec<String>,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub current_medications: Vec<String>,
}

impl CreatePatientRequest {
    /// Converts into a new patient row with an empty notes sequence.
    pub fn into_patient(self, now: DateTime<Utc>) -> Patient {
        Patient {
            id: self.id,
            record_type: RecordType::Patient,
            name: self.name,
            email: self.email,
            date_of_birth: self.date_of_birth,
            blood_type: self.blood_type,
            allergies: self.allergies,
            medical_history: self.medical_history,
            emergency_contacts: self.emergency_contacts,
            current_medications: self.current_medications,
            created_at: now,
            updated_at: now,
            notes: Vec::new(),
        }
    }
}

/// Request payload for updating a patient.
///
/// Only the attributes listed here can change. Keys such as `id`, `type` and
/// `notes` are not part of the payload and are dropped on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contacts: Option<Vec<EmergencyContact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_medications: Option<Vec<String>>,
}

impl UpdatePatientRequest {
    /// Create an empty update request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the patient name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the patient email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the allergies list.
    pub fn with_allergies(mut self, allergies: Vec<String>) -> Self {
        self.allergies = Some(allergies);
        self
    }

    /// Apply updates to an existing patient. Does not touch `updated_at`.
    pub fn apply_to(&self, patient: &mut Patient) {
        if let Some(name) = &self.name {
            patient.name = name.clone();
        }
        if let Some(email) = &self.email {
            patient.email = email.clone();
        }
        if let Some(date_of_birth) = &self.date_of_birth {
            patient.date_of_birth = date_of_birth.clone();
        }
        if let Some(blood_type) = &self.blood_type {
            patient.blood_type = blood_type.clone();
        }
        if let Some(allergies) = &self.allergies {
            patient.allergies = allergies.clone();
        }
        if let Some(medical_history) = &self.medical_history {
            patient.medical_history = medical_history.clone();
        }
        if let Some(emergency_contacts) = &self.emergency_contacts {
            patient.emergency_contacts = emergency_contacts.clone();
        }
        if let Some(current_medications) = &self.current_medications {
            patient.current_medications = current_medications.clone();
        }
    }
}

/// Request payload for adding a note to a patient.
///
/// `author` and `content` are optional at the type level so that their absence
/// can be reported as a validation error instead of a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddNoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_content",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Value>,
}

impl AddNoteRequest {
    /// Create a request with the required fields. A bare string content is
    /// wrapped the same way a request body would be.
    pub fn new(author: impl Into<String>, content: impl Into<Value>) -> Self {
        Self {
            id: None,
            author: Some(author.into()),
            content: Some(normalize_content(content.into())),
        }
    }

    /// Use a caller-chosen note id instead of a generated one.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Validates the request and converts it into a note owned by `patient_id`.
    ///
    /// A caller-supplied id is used verbatim; otherwise a fresh `Note#<uuid>`
    /// id is generated.
    pub fn into_note(self, patient_id: &str, now: DateTime<Utc>) -> Result<Note, NoteError> {
        let (Some(author), Some(content)) = (self.author, self.content) else {
            return Err(NoteError::MissingRequiredFields);
        };

        Ok(Note {
            id: self.id.unwrap_or_else(generate_note_id),
            patient_id: patient_id.to_string(),
            author,
            content,
            created_at: now,
            updated_at: now,
            record_type: RecordType::Note,
        })
    }
}

/// Request payload for updating a note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_content",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Value>,
}

impl UpdateNoteRequest {
    /// Set the note author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Apply updates to an existing note. Does not touch `updated_at`.
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(author) = &self.author {
            note.author = author.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
    }
}
