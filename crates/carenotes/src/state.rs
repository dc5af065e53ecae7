//! Application state.
//!
//! Holds the patient repository shared by the HTTP adapter and the Lambda
//! runner. The backend is chosen at compile time via feature flags.

use std::sync::Arc;

use carenotes_core::storage::PatientRepository;

use crate::config::Config;

/// Shared application state.
///
/// Cloned for each request; the repository is created once per process and
/// reused across requests.
#[derive(Clone)]
pub struct AppState {
    pub patient_repo: Arc<dyn PatientRepository>,
}

impl AppState {
    /// Wraps an existing repository.
    pub fn with_repository(patient_repo: Arc<dyn PatientRepository>) -> Self {
        Self { patient_repo }
    }
}

#[cfg(feature = "inmemory")]
mod inmemory_backend {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates the state with an empty in-memory store.
        pub async fn new(config: &Config) -> anyhow::Result<Self> {
            tracing::warn!(
                table = %config.table_name,
                "Using in-memory storage, data is lost on restart"
            );
            Ok(Self::with_repository(Arc::new(InMemoryRepository::new())))
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb_backend {
    use super::*;
    use crate::storage::{AwsSettings, DynamoDbRepository};

    impl AppState {
        /// Creates the state backed by DynamoDB.
        ///
        /// The SDK client itself is created on the first store call.
        pub async fn new(config: &Config) -> anyhow::Result<Self> {
            let settings = AwsSettings {
                region: config.aws_region.clone(),
                endpoint_url: config.aws_endpoint_url.clone(),
            };
            let repo = DynamoDbRepository::new(settings, config.table_name.clone());
            tracing::info!(table = %repo.table_name(), "Using DynamoDB storage");

            Ok(Self::with_repository(Arc::new(repo)))
        }
    }
}
