//! HTTP gateway adapter.
//!
//! Plays the role of the API gateway for local runs: every request under a
//! patient resource is turned into a [`RequestEnvelope`], passed to
//! [`dispatch`], and the returned [`ResponseEnvelope`] is written back as a
//! plain HTTP response.

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::{MatchedPath, Request, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::Response,
    routing::{any, get, post},
    Json, Router,
};
use carenotes_core::envelope::{no_content, respond, RequestEnvelope, ResponseEnvelope};
use carenotes_core::routing::{
    extract_path_parameters, NOTES_RESOURCE, NOTE_RESOURCE, PATIENTS_RESOURCE, PATIENT_RESOURCE,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::{dispatch, health::livez},
    state::AppState,
};

/// Largest request body the adapter will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route(PATIENTS_RESOURCE, any(gateway))
        .route(PATIENT_RESOURCE, any(gateway))
        .route(NOTES_RESOURCE, any(gateway))
        .route(NOTE_RESOURCE, any(gateway))
        .route("/invoke", post(invoke))
        .route("/livez", get(livez))
        // Unknown paths still go through the router so they get its 405
        .fallback(gateway)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}

/// Any method on a patient resource.
async fn gateway(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    if parts.method == Method::OPTIONS {
        return envelope_into_response(no_content());
    }

    let path = parts.uri.path().to_string();
    let resource = parts
        .extensions
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    let body = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) if bytes.is_empty() => None,
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to read request body");
            return envelope_into_response(respond(
                StatusCode::PAYLOAD_TOO_LARGE.as_u16(),
                "Request body too large",
            ));
        }
    };

    let path_parameters = extract_path_parameters(&resource, &path);
    let envelope = RequestEnvelope {
        resource: Some(resource),
        http_method: Some(parts.method.to_string()),
        path_parameters: (!path_parameters.is_empty()).then_some(path_parameters),
        body,
    };

    envelope_into_response(dispatch(&state, envelope).await)
}

/// POST /invoke - Raw gateway event in, raw response envelope out.
async fn invoke(
    State(state): State<AppState>,
    Json(event): Json<RequestEnvelope>,
) -> Json<ResponseEnvelope> {
    Json(dispatch(&state, event).await)
}

/// Writes an envelope as an HTTP response. 204 responses have no body.
fn envelope_into_response(envelope: ResponseEnvelope) -> Response {
    let status =
        StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = if status == StatusCode::NO_CONTENT {
        Body::empty()
    } else {
        Body::from(envelope.body)
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;

    let headers = response.headers_mut();
    for (name, value) in &envelope.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping invalid response header"),
        }
    }
    if status != StatusCode::NO_CONTENT {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }

    response
}
