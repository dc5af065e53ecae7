//! Patient operations.

use chrono::Utc;

use carenotes_core::envelope::{no_content, respond, RequestEnvelope, ResponseEnvelope};
use carenotes_core::patient::{CreatePatientRequest, UpdatePatientRequest};
use carenotes_core::routing::PATIENT_ID_PARAM;
use carenotes_core::storage::PatientRepository;

use super::error::{HandlerError, PATIENT_NOT_FOUND};
use super::{json_body, path_parameter};

/// POST /patients - Writes a new row, overwriting any row with the same id.
pub async fn create_patient(
    repo: &dyn PatientRepository,
    request: &RequestEnvelope,
) -> Result<ResponseEnvelope, HandlerError> {
    let payload: CreatePatientRequest = json_body(request)?;
    let patient = payload.into_patient(Utc::now());

    repo.put_patient(&patient).await?;
    tracing::info!(patient_id = %patient.id, "Created patient");

    Ok(respond(201, &patient))
}

/// GET /patients/{id}
pub async fn get_patient(
    repo: &dyn PatientRepository,
    request: &RequestEnvelope,
) -> Result<ResponseEnvelope, HandlerError> {
    let id = path_parameter(request, PATIENT_ID_PARAM)?;

    let patient = repo
        .get_patient(&id)
        .await?
        .ok_or(HandlerError::NotFound(PATIENT_NOT_FOUND))?;

    Ok(respond(200, &patient))
}

/// PUT /patients/{id} - Sets the supplied attributes and `updatedAt`.
pub async fn update_patient(
    repo: &dyn PatientRepository,
    request: &RequestEnvelope,
) -> Result<ResponseEnvelope, HandlerError> {
    let id = path_parameter(request, PATIENT_ID_PARAM)?;
    let changes: UpdatePatientRequest = json_body(request)?;

    let patient = repo
        .update_patient(&id, &changes, Utc::now())
        .await
        .map_err(HandlerError::from_patient_write)?;
    tracing::info!(patient_id = %id, "Updated patient");

    Ok(respond(200, &patient))
}

/// DELETE /patients/{id} - Idempotent; notes go with the row.
pub async fn delete_patient(
    repo: &dyn PatientRepository,
    request: &RequestEnvelope,
) -> Result<ResponseEnvelope, HandlerError> {
    let id = path_parameter(request, PATIENT_ID_PARAM)?;

    repo.delete_patient(&id).await?;
    tracing::info!(patient_id = %id, "Deleted patient");

    Ok(no_content())
}
