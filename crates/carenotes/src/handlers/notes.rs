//! Note operations.
//!
//! Notes live inside their patient's row. Update and delete read the whole
//! list, change it in memory and write it back unconditionally, so two
//! concurrent writers on the same patient can lose one of the changes.

use chrono::Utc;

use carenotes_core::envelope::{no_content, respond, RequestEnvelope, ResponseEnvelope};
use carenotes_core::patient::{self, AddNoteRequest, Patient, UpdateNoteRequest};
use carenotes_core::routing::{NOTE_ID_PARAM, PATIENT_ID_PARAM};
use carenotes_core::storage::PatientRepository;

use super::error::{HandlerError, NOTE_NOT_FOUND, NO_NOTES_FOUND, PATIENT_NOT_FOUND};
use super::{json_body, path_parameter};

/// POST /patients/{id}/notes - Appends a note and returns the whole patient.
pub async fn add_note(
    repo: &dyn PatientRepository,
    request: &RequestEnvelope,
) -> Result<ResponseEnvelope, HandlerError> {
    let patient_id = path_parameter(request, PATIENT_ID_PARAM)?;
    let payload: AddNoteRequest = json_body(request)?;
    let note = payload.into_note(&patient_id, Utc::now())?;

    let patient = repo
        .append_note(&patient_id, &note)
        .await
        .map_err(|err| {
            if err.is_not_found() {
                HandlerError::NotFound(PATIENT_NOT_FOUND)
            } else {
                HandlerError::NoteAppend(err)
            }
        })?;
    tracing::info!(patient_id = %patient_id, note_id = %note.id, "Added note");

    Ok(respond(201, &patient))
}

/// GET /patients/{id}/notes
///
/// A patient without notes is reported the same way as a missing patient.
pub async fn list_notes(
    repo: &dyn PatientRepository,
    request: &RequestEnvelope,
) -> Result<ResponseEnvelope, HandlerError> {
    let patient_id = path_parameter(request, PATIENT_ID_PARAM)?;

    let patient = repo
        .get_patient(&patient_id)
        .await?
        .filter(Patient::has_notes)
        .ok_or(HandlerError::NotFound(NO_NOTES_FOUND))?;

    Ok(respond(200, &patient.notes))
}

/// GET /patients/{id}/notes/{noteId}
pub async fn get_note(
    repo: &dyn PatientRepository,
    request: &RequestEnvelope,
) -> Result<ResponseEnvelope, HandlerError> {
    let patient_id = path_parameter(request, PATIENT_ID_PARAM)?;
    let note_id = path_parameter(request, NOTE_ID_PARAM)?;

    let patient = load_for_note(repo, &patient_id).await?;
    let note =
        patient::find_note(&patient.notes, &note_id).ok_or(HandlerError::NotFound(NOTE_NOT_FOUND))?;

    Ok(respond(200, note))
}

/// PUT /patients/{id}/notes/{noteId} - Returns the whole patient.
pub async fn update_note(
    repo: &dyn PatientRepository,
    request: &RequestEnvelope,
) -> Result<ResponseEnvelope, HandlerError> {
    let patient_id = path_parameter(request, PATIENT_ID_PARAM)?;
    let note_id = path_parameter(request, NOTE_ID_PARAM)?;
    let changes: UpdateNoteRequest = json_body(request)?;

    let mut notes = load_for_note(repo, &patient_id).await?.notes;
    patient::update_note(&mut notes, &note_id, &changes, Utc::now())
        .ok_or(HandlerError::NotFound(NOTE_NOT_FOUND))?;

    let patient = repo
        .replace_notes(&patient_id, &notes)
        .await
        .map_err(HandlerError::from_patient_write)?;
    tracing::info!(patient_id = %patient_id, note_id = %note_id, "Updated note");

    Ok(respond(200, &patient))
}

/// DELETE /patients/{id}/notes/{noteId}
///
/// The filtered list is written back even when no note matched.
pub async fn delete_note(
    repo: &dyn PatientRepository,
    request: &RequestEnvelope,
) -> Result<ResponseEnvelope, HandlerError> {
    let patient_id = path_parameter(request, PATIENT_ID_PARAM)?;
    let note_id = path_parameter(request, NOTE_ID_PARAM)?;

    let notes = load_for_note(repo, &patient_id).await?.notes;
    let remaining = patient::remove_note(&notes, &note_id);
    if remaining.len() == notes.len() {
        tracing::debug!(patient_id = %patient_id, note_id = %note_id, "No note matched");
    }

    repo.replace_notes(&patient_id, &remaining)
        .await
        .map_err(HandlerError::from_patient_write)?;
    tracing::info!(patient_id = %patient_id, note_id = %note_id, "Deleted note");

    Ok(no_content())
}

/// Fetches the owning patient; a missing one reads as a missing note.
async fn load_for_note(
    repo: &dyn PatientRepository,
    patient_id: &str,
) -> Result<Patient, HandlerError> {
    repo.get_patient(patient_id)
        .await?
        .ok_or(HandlerError::NotFound(NOTE_NOT_FOUND))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use carenotes_core::routing::{NOTES_RESOURCE, NOTE_RESOURCE};
    use carenotes_core::patient::CreatePatientRequest;
    use serde_json::{json, Value};

    use crate::handlers::dispatch;
    use crate::handlers::testing::{create_body, seed_note, seed_patient};
    use crate::state::test_support::FailingRepository;
    use crate::state::AppState;

    fn note_request(method: &str, patient_id: &str, note_id: &str) -> RequestEnvelope {
        RequestEnvelope::new(NOTE_RESOURCE, method)
            .with_path_parameter("id", patient_id)
            .with_path_parameter("noteId", note_id)
    }

    fn list_request(patient_id: &str) -> RequestEnvelope {
        RequestEnvelope::new(NOTES_RESOURCE, "GET").with_path_parameter("id", patient_id)
    }

    #[tokio::test]
    async fn test_add_note_normalizes_string_content() {
        let state = AppState::default();
        seed_patient(&state, "p1").await;

        let response = seed_note(&state, "p1", json!({"author": "Dr.Who", "content": "stable"})).await;

        assert_eq!(response.status_code, 201);
        let patient = response.json_body().unwrap();
        assert_eq!(patient["notes"].as_array().unwrap().len(), 1);
        let note = &patient["notes"][0];
        assert_eq!(note["author"], "Dr.Who");
        assert_eq!(note["content"], json!(["stable"]));
        assert!(note["id"].as_str().unwrap().starts_with("Note#"));
        assert_eq!(note["createdAt"], note["updatedAt"]);
    }

    #[tokio::test]
    async fn test_add_note_keeps_list_content() {
        let state = AppState::default();
        seed_patient(&state, "p1").await;

        let response = seed_note(
            &state,
            "p1",
            json!({"author": "Dr.Who", "content": ["line 1", "line 2"]}),
        )
        .await;

        let note = &response.json_body().unwrap()["notes"][0];
        assert_eq!(note["content"], json!(["line 1", "line 2"]));
    }

    #[tokio::test]
    async fn test_add_note_missing_fields() {
        let state = AppState::default();
        seed_patient(&state, "p1").await;

        for body in [json!({"author": "Dr.Who"}), json!({"content": "stable"}), json!({})] {
            let response = seed_note(&state, "p1", body).await;

            assert_eq!(response.status_code, 400);
            assert_eq!(
                response.json_body().unwrap(),
                "Missing required fields: author and content are required."
            );
        }

        let stored = state.patient_repo.get_patient("p1").await.unwrap().unwrap();
        assert!(stored.notes.is_empty());
    }

    #[tokio::test]
    async fn test_add_note_to_missing_patient() {
        let state = AppState::default();

        let response = seed_note(&state, "ghost", json!({"author": "Dr.Who", "content": "x"})).await;

        assert_eq!(response.status_code, 404);
        assert_eq!(response.json_body().unwrap(), "Patient not found");
        assert!(state.patient_repo.get_patient("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_notes_preserves_insertion_order() {
        let state = AppState::default();
        seed_patient(&state, "p1").await;
        for id in ["n1", "n2", "n3"] {
            seed_note(&state, "p1", json!({"id": id, "author": "Dr.Who", "content": id})).await;
        }

        let response = dispatch(&state, list_request("p1")).await;

        assert_eq!(response.status_code, 200);
        let notes = response.json_body().unwrap();
        let ids: Vec<&str> = notes
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["n1", "n2", "n3"]);
    }

    #[tokio::test]
    async fn test_list_notes_never_noted_patient_is_not_found() {
        let state = AppState::default();
        seed_patient(&state, "p1").await;

        let response = dispatch(&state, list_request("p1")).await;

        assert_eq!(response.status_code, 404);
        assert_eq!(response.json_body().unwrap(), "No notes found for this patient");
    }

    #[tokio::test]
    async fn test_list_notes_missing_patient_is_not_found() {
        let state = AppState::default();

        let response = dispatch(&state, list_request("ghost")).await;

        assert_eq!(response.status_code, 404);
        assert_eq!(response.json_body().unwrap(), "No notes found for this patient");
    }

    #[tokio::test]
    async fn test_get_note_by_id() {
        let state = AppState::default();
        seed_patient(&state, "p1").await;
        seed_note(&state, "p1", json!({"id": "n1", "author": "Dr.A", "content": "a"})).await;
        seed_note(&state, "p1", json!({"id": "n2", "author": "Dr.B", "content": "b"})).await;

        let first = dispatch(&state, note_request("GET", "p1", "n1")).await;
        let second = dispatch(&state, note_request("GET", "p1", "n2")).await;
        let missing = dispatch(&state, note_request("GET", "p1", "n3")).await;

        assert_eq!(first.json_body().unwrap()["author"], "Dr.A");
        assert_eq!(second.json_body().unwrap()["author"], "Dr.B");
        assert_eq!(missing.status_code, 404);
        assert_eq!(missing.json_body().unwrap(), "Note not found");
    }

    #[tokio::test]
    async fn test_get_note_decodes_generated_id() {
        let state = AppState::default();
        seed_patient(&state, "p1").await;
        let created = seed_note(&state, "p1", json!({"author": "Dr.Who", "content": "x"})).await;
        let note_id = created.json_body().unwrap()["notes"][0]["id"]
            .as_str()
            .unwrap()
            .to_string();
        let encoded = note_id.replace('#', "%23");

        let response = dispatch(&state, note_request("GET", "p1", &encoded)).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.json_body().unwrap()["id"], note_id);
    }

    #[tokio::test]
    async fn test_get_note_on_missing_patient() {
        let state = AppState::default();

        let response = dispatch(&state, note_request("GET", "ghost", "n1")).await;

        assert_eq!(response.status_code, 404);
        assert_eq!(response.json_body().unwrap(), "Note not found");
    }

    #[tokio::test]
    async fn test_update_note_only_touches_target() {
        let state = AppState::default();
        seed_patient(&state, "p1").await;
        seed_note(&state, "p1", json!({"id": "n1", "author": "Dr.A", "content": "a"})).await;
        seed_note(&state, "p1", json!({"id": "n2", "author": "Dr.B", "content": "b"})).await;
        let before = state.patient_repo.get_patient("p1").await.unwrap().unwrap();

        let response = dispatch(
            &state,
            note_request("PUT", "p1", "n2").with_json_body(&json!({
                "author": "Dr.C",
                "id": "hijack",
                "patientId": "p9"
            })),
        )
        .await;

        assert_eq!(response.status_code, 200);
        let patient = response.json_body().unwrap();
        assert_eq!(patient["id"], "p1");
        let updated = &patient["notes"][1];
        assert_eq!(updated["id"], "n2");
        assert_eq!(updated["author"], "Dr.C");
        assert_eq!(updated["patientId"], "p1");
        assert_eq!(
            patient["notes"][0],
            serde_json::to_value(&before.notes[0]).unwrap()
        );
    }

    #[tokio::test]
    async fn test_update_missing_note_is_not_found() {
        let state = AppState::default();
        seed_patient(&state, "p1").await;
        seed_note(&state, "p1", json!({"id": "n1", "author": "Dr.A", "content": "a"})).await;

        let response = dispatch(
            &state,
            note_request("PUT", "p1", "n9").with_json_body(&json!({"author": "Dr.C"})),
        )
        .await;

        assert_eq!(response.status_code, 404);
        assert_eq!(response.json_body().unwrap(), "Note not found");
    }

    #[tokio::test]
    async fn test_delete_nonexistent_note_leaves_list_unchanged() {
        let state = AppState::default();
        seed_patient(&state, "p1").await;
        seed_note(&state, "p1", json!({"id": "n1", "author": "Dr.A", "content": "a"})).await;
        let before = dispatch(&state, list_request("p1")).await;

        let response = dispatch(&state, note_request("DELETE", "p1", "n9")).await;

        assert_eq!(response.status_code, 204);
        assert_eq!(response.json_body().unwrap(), Value::Null);
        let after = dispatch(&state, list_request("p1")).await;
        assert_eq!(after.body, before.body);
    }

    #[tokio::test]
    async fn test_delete_note_on_missing_patient() {
        let state = AppState::default();

        let response = dispatch(&state, note_request("DELETE", "ghost", "n1")).await;

        assert_eq!(response.status_code, 404);
        assert_eq!(response.json_body().unwrap(), "Note not found");
    }

    #[tokio::test]
    async fn test_append_failure_is_reported_as_error_adding_note() {
        let patient = serde_json::from_value::<CreatePatientRequest>(create_body("p1"))
            .unwrap()
            .into_patient(Utc::now());
        let state = AppState::with_repository(Arc::new(FailingRepository::with_patient(&patient).await));

        let response = seed_note(&state, "p1", json!({"author": "Dr.Who", "content": "x"})).await;

        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.json_body().unwrap(),
            "Error adding note: Throughput exceeded, please retry"
        );
    }

    #[tokio::test]
    async fn test_rewrite_failure_is_reported_as_error() {
        let mut patient = serde_json::from_value::<CreatePatientRequest>(create_body("p1"))
            .unwrap()
            .into_patient(Utc::now());
        patient.notes.push(
            AddNoteRequest::new("Dr.Who", "x")
                .with_id("n1")
                .into_note("p1", Utc::now())
                .unwrap(),
        );
        let state = AppState::with_repository(Arc::new(FailingRepository::with_patient(&patient).await));

        let update = dispatch(
            &state,
            note_request("PUT", "p1", "n1").with_json_body(&json!({"author": "Dr.C"})),
        )
        .await;
        let delete = dispatch(&state, note_request("DELETE", "p1", "n1")).await;

        for response in [update, delete] {
            assert_eq!(response.status_code, 500);
            assert_eq!(
                response.json_body().unwrap(),
                "Error: Throughput exceeded, please retry"
            );
        }
    }

    #[tokio::test]
    async fn test_non_string_content_is_stored_as_sent() {
        let state = AppState::default();
        seed_patient(&state, "p1").await;
        let shapes = [json!([1, 2]), json!({"k": "v"}), json!(["a", 3])];

        for (index, content) in shapes.iter().enumerate() {
            let id = format!("n{index}");
            let response = seed_note(
                &state,
                "p1",
                json!({"id": id, "author": "Dr.Who", "content": content}),
            )
            .await;

            assert_eq!(response.status_code, 201);
            assert_eq!(response.json_body().unwrap()["notes"][index]["content"], *content);

            let fetched = dispatch(&state, note_request("GET", "p1", &id)).await;
            assert_eq!(fetched.status_code, 200);
            assert_eq!(fetched.json_body().unwrap()["content"], *content);
        }
    }

    #[tokio::test]
    async fn test_update_note_replaces_content_verbatim() {
        let state = AppState::default();
        seed_patient(&state, "p1").await;
        seed_note(&state, "p1", json!({"id": "n1", "author": "Dr.Who", "content": "a"})).await;

        let response = dispatch(
            &state,
            note_request("PUT", "p1", "n1").with_json_body(&json!({"content": [1, "b"]})),
        )
        .await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.json_body().unwrap()["notes"][0]["content"], json!([1, "b"]));
    }
}
