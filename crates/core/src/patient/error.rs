use thiserror::Error;

/// Errors that can occur when validating a note before it is stored.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NoteError {
    #[error("Missing required fields: author and content are required.")]
    MissingRequiredFields,
}
