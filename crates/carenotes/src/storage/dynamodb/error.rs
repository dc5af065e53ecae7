//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `RepositoryError` from `carenotes_core::storage`.

use std::error::Error;
use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use carenotes_core::storage::RepositoryError;

/// Requests that never reached the service become `ConnectionFailed`.
fn connection_failure<E, R>(err: &SdkError<E, R>) -> Option<RepositoryError>
where
    E: Error + 'static,
    R: Debug,
{
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            Some(map_connection_error(DisplayErrorContext(err)))
        }
        _ => None,
    }
}

/// Message reported by the service, or the debug form of the error.
fn describe<E: ProvideErrorMetadata + Debug>(err: &E) -> String {
    err.message()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{err:?}"))
}

/// Map a GetItem SDK error to RepositoryError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> RepositoryError {
    if let Some(failure) = connection_failure(&err) {
        return failure;
    }
    RepositoryError::QueryFailed(describe(&err.into_service_error()))
}

/// Map a PutItem SDK error to RepositoryError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> RepositoryError {
    if let Some(failure) = connection_failure(&err) {
        return failure;
    }
    RepositoryError::QueryFailed(describe(&err.into_service_error()))
}

/// Map an UpdateItem SDK error to RepositoryError.
///
/// A failed `attribute_exists` condition means the row is missing.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    if let Some(failure) = connection_failure(&err) {
        return failure;
    }
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => RepositoryError::NotFound {
            entity_type,
            id: id.into(),
        },
        err => RepositoryError::QueryFailed(describe(&err)),
    }
}

/// Map a DeleteItem SDK error to RepositoryError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> RepositoryError {
    if let Some(failure) = connection_failure(&err) {
        return failure;
    }
    RepositoryError::QueryFailed(describe(&err.into_service_error()))
}

/// Map a generic connection/config error to RepositoryError.
pub fn map_connection_error(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::ConnectionFailed(err.to_string())
}
