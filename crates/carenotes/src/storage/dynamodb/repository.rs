//! DynamoDB repository implementation.
//!
//! Implements `PatientRepository` from `carenotes_core::storage` using DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::ReturnValue;
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;

use carenotes_core::patient::{Note, Patient, RecordType, UpdatePatientRequest};
use carenotes_core::storage::{PatientRepository, RepositoryError, Result};

use super::client::{create_client, AwsSettings};
use super::conversions::{item_to_patient, patient_to_item};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_update_item_error,
};
use super::expressions::{append_note_update, patient_update, replace_notes_update, ConditionalUpdate};
use super::keys;

/// DynamoDB-based repository implementation.
///
/// The SDK client is created on first use and reused for the lifetime of the
/// repository, so warm invocations skip client setup.
pub struct DynamoDbRepository {
    client: OnceCell<Client>,
    settings: AwsSettings,
    table_name: String,
}

impl DynamoDbRepository {
    /// Creates a repository that connects lazily using `settings`.
    pub fn new(settings: AwsSettings, table_name: impl Into<String>) -> Self {
        Self {
            client: OnceCell::new(),
            settings,
            table_name: table_name.into(),
        }
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| create_client(&self.settings))
            .await
    }

    /// Runs a conditional update and returns the full updated row.
    async fn send_update(&self, patient_id: &str, update: ConditionalUpdate) -> Result<Patient> {
        let result = self
            .client()
            .await
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(keys::patient_key(patient_id)))
            .update_expression(update.update_expression)
            .condition_expression(update.condition_expression)
            .set_expression_attribute_names(Some(update.names))
            .set_expression_attribute_values(Some(update.values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|e| map_update_item_error(e, RecordType::Patient.as_str(), patient_id))?;

        let attributes = result.attributes.ok_or_else(|| {
            RepositoryError::Serialization("UpdateItem returned no attributes".to_string())
        })?;

        item_to_patient(&attributes)
    }
}

#[async_trait]
impl PatientRepository for DynamoDbRepository {
    async fn get_patient(&self, id: &str) -> Result<Option<Patient>> {
        let result = self
            .client()
            .await
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(keys::patient_key(id)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => Ok(Some(item_to_patient(&item)?)),
            None => Ok(None),
        }
    }

    async fn put_patient(&self, patient: &Patient) -> Result<()> {
        let item = patient_to_item(patient)?;

        self.client()
            .await
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    async fn update_patient(
        &self,
        id: &str,
        changes: &UpdatePatientRequest,
        updated_at: DateTime<Utc>,
    ) -> Result<Patient> {
        let update = patient_update(changes, updated_at)?;
        self.send_update(id, update).await
    }

    async fn append_note(&self, patient_id: &str, note: &Note) -> Result<Patient> {
        let update = append_note_update(note)?;
        self.send_update(patient_id, update).await
    }

    async fn replace_notes(&self, patient_id: &str, notes: &[Note]) -> Result<Patient> {
        let update = replace_notes_update(notes)?;
        self.send_update(patient_id, update).await
    }

    async fn delete_patient(&self, id: &str) -> Result<()> {
        self.client()
            .await
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(keys::patient_key(id)))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }
}
