//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use carenotes_core::patient::{Note, Patient, RecordType, UpdatePatientRequest};
use carenotes_core::storage::{PatientRepository, RepositoryError, Result};

/// In-memory storage backend.
///
/// Mirrors the semantics of the DynamoDB backend: writes that need an
/// existing row fail with `NotFound`, puts overwrite, deletes are idempotent.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    patients: Arc<RwLock<HashMap<String, Patient>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: &str) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type: RecordType::Patient.as_str(),
        id: id.to_string(),
    }
}

#[async_trait]
impl PatientRepository for InMemoryRepository {
    async fn get_patient(&self, id: &str) -> Result<Option<Patient>> {
        let patients = self.patients.read().await;
        Ok(patients.get(id).cloned())
    }

    async fn put_patient(&self, patient: &Patient) -> Result<()> {
        let mut patients = self.patients.write().await;
        patients.insert(patient.id.clone(), patient.clone());
        Ok(())
    }

    async fn update_patient(
        &self,
        id: &str,
        changes: &UpdatePatientRequest,
        updated_at: DateTime<Utc>,
    ) -> Result<Patient> {
        let mut patients = self.patients.write().await;
        let patient = patients.get_mut(id).ok_or_else(|| not_found(id))?;
        changes.apply_to(patient);
        patient.updated_at = updated_at;
        Ok(patient.clone())
    }

    async fn append_note(&self, patient_id: &str, note: &Note) -> Result<Patient> {
        let mut patients = self.patients.write().await;
        let patient = patients
            .get_mut(patient_id)
            .ok_or_else(|| not_found(patient_id))?;
        patient.notes.push(note.clone());
        Ok(patient.clone())
    }

    async fn replace_notes(&self, patient_id: &str, notes: &[Note]) -> Result<Patient> {
        let mut patients = self.patients.write().await;
        let patient = patients
            .get_mut(patient_id)
            .ok_or_else(|| not_found(patient_id))?;
        patient.notes = notes.to_vec();
        Ok(patient.clone())
    }

    async fn delete_patient(&self, id: &str) -> Result<()> {
        let mut patients = self.patients.write().await;
        patients.remove(id);
        Ok(())
    }
}
