use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::patient::{Note, Patient, UpdatePatientRequest};

use super::Result;

/// Store collaborator for patient rows.
///
/// Rows are addressed by (`id`, `type` = "Patient"). Every method performs a
/// single store round-trip; none of them retries.
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Gets a patient by id.
    async fn get_patient(&self, id: &str) -> Result<Option<Patient>>;

    /// Writes the full row, overwriting any existing row with the same key.
    async fn put_patient(&self, patient: &Patient) -> Result<()>;

    /// Sets the supplied attributes and `updatedAt`, returning the updated row.
    ///
    /// Fails with `NotFound` if the row does not exist.
    async fn update_patient(
        &self,
        id: &str,
        changes: &UpdatePatientRequest,
        updated_at: DateTime<Utc>,
    ) -> Result<Patient>;

    /// Appends a note to the patient's notes, initializing the sequence if it
    /// is absent, and returns the updated row.
    ///
    /// Fails with `NotFound` if the row does not exist.
    async fn append_note(&self, patient_id: &str, note: &Note) -> Result<Patient>;

    /// Replaces the whole notes sequence and returns the updated row.
    ///
    /// This is an unconditional overwrite of the list: a concurrent writer's
    /// changes made since the caller's read are lost. Fails with `NotFound` if
    /// the row does not exist.
    async fn replace_notes(&self, patient_id: &str, notes: &[Note]) -> Result<Patient>;

    /// Deletes a patient. Deleting a missing row succeeds.
    async fn delete_patient(&self, id: &str) -> Result<()>;
}
