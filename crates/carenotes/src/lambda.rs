//! AWS Lambda runner.
//!
//! Receives proxy-integration events from the Lambda runtime and answers
//! with the envelope produced by [`dispatch`]. Failures are already encoded
//! in the envelope, so the handler itself never errors.

use carenotes_core::envelope::{RequestEnvelope, ResponseEnvelope};
use lambda_runtime::{service_fn, Error, LambdaEvent};

use crate::{handlers::dispatch, state::AppState};

/// Runs the Lambda event loop until the runtime shuts the process down.
pub async fn run(state: AppState) -> Result<(), Error> {
    tracing::info!("Starting Lambda runtime");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<RequestEnvelope>| {
        let state = state.clone();
        async move {
            tracing::debug!(request_id = %event.context.request_id, "Invocation");
            Ok::<ResponseEnvelope, Error>(dispatch(&state, event.payload).await)
        }
    }))
    .await
}
