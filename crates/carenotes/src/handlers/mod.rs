//! Request dispatch.
//!
//! [`dispatch`] is the single entry point shared by the HTTP adapter and the
//! Lambda runner: it routes a gateway event to an operation and turns every
//! outcome, success or failure, into a [`ResponseEnvelope`].

pub mod error;
pub mod health;
mod notes;
mod patients;

use carenotes_core::envelope::{RequestEnvelope, ResponseEnvelope};
use carenotes_core::routing::{decode_path_parameter, resolve_route, Route};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub use error::HandlerError;

use crate::state::AppState;

/// Handles one gateway event.
pub async fn dispatch(state: &AppState, request: RequestEnvelope) -> ResponseEnvelope {
    tracing::info!(event = ?request, "Received event");

    match route_request(state, &request).await {
        Ok(response) => response,
        Err(err) => err.into(),
    }
}

async fn route_request(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<ResponseEnvelope, HandlerError> {
    let route = resolve_route(request.resource.as_deref(), request.http_method.as_deref())?;
    tracing::debug!(operation = route.name(), "Dispatching request");

    let repo = state.patient_repo.as_ref();
    match route {
        Route::CreatePatient => patients::create_patient(repo, request).await,
        Route::GetPatient => patients::get_patient(repo, request).await,
        Route::UpdatePatient => patients::update_patient(repo, request).await,
        Route::DeletePatient => patients::delete_patient(repo, request).await,
        Route::AddNote => notes::add_note(repo, request).await,
        Route::ListNotes => notes::list_notes(repo, request).await,
        Route::GetNote => notes::get_note(repo, request).await,
        Route::UpdateNote => notes::update_note(repo, request).await,
        Route::DeleteNote => notes::delete_note(repo, request).await,
    }
}

/// Reads and percent-decodes a required path parameter.
fn path_parameter(request: &RequestEnvelope, name: &str) -> Result<String, HandlerError> {
    request
        .path_parameter(name)
        .map(decode_path_parameter)
        .ok_or_else(|| HandlerError::missing_path_parameter(name))
}

/// Parses the JSON body, which must be an object. A missing body is a parse failure.
fn json_body<T: DeserializeOwned>(request: &RequestEnvelope) -> Result<T, HandlerError> {
    let body = request.body.as_deref().unwrap_or_default();
    let fields: Map<String, Value> = serde_json::from_str(body)?;
    Ok(serde_json::from_value(Value::Object(fields))?)
}
