use carenotes_core::envelope::{respond, ResponseEnvelope};
use carenotes_core::patient::NoteError;
use carenotes_core::routing::RoutingError;
use carenotes_core::storage::{repository_error_to_status_code, RepositoryError};
use thiserror::Error;

pub const PATIENT_NOT_FOUND: &str = "Patient not found";
pub const NOTE_NOT_FOUND: &str = "Note not found";
pub const NO_NOTES_FOUND: &str = "No notes found for this patient";

/// Every way a request can fail.
///
/// The display text is the exact message placed in the response body.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Routing(#[from] RoutingError),
    #[error(transparent)]
    Validation(#[from] NoteError),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Error: {}", .0.message())]
    Store(#[from] RepositoryError),
    #[error("Error adding note: {}", .0.message())]
    NoteAppend(RepositoryError),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl HandlerError {
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::Routing(RoutingError::MissingResourceOrMethod) => 400,
            HandlerError::Routing(RoutingError::MethodNotAllowed { .. }) => 405,
            HandlerError::Validation(_) => 400,
            HandlerError::NotFound(_) => 404,
            HandlerError::Store(err) => repository_error_to_status_code(err),
            HandlerError::NoteAppend(_) => 500,
            HandlerError::Unexpected(_) => 500,
        }
    }

    pub fn missing_path_parameter(name: &str) -> Self {
        HandlerError::Unexpected(format!("missing path parameter `{name}`"))
    }

    /// A write that needs an existing row reports a missing patient as 404.
    pub fn from_patient_write(err: RepositoryError) -> Self {
        if err.is_not_found() {
            HandlerError::NotFound(PATIENT_NOT_FOUND)
        } else {
            HandlerError::Store(err)
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::Unexpected(err.to_string())
    }
}

impl From<HandlerError> for ResponseEnvelope {
    fn from(err: HandlerError) -> Self {
        let status = err.status_code();
        let message = err.to_string();

        if status >= 500 {
            tracing::error!(status, error = %message, "Request failed");
        } else {
            tracing::warn!(status, error = %message, "Request rejected");
        }

        respond(status, &message)
    }
}
