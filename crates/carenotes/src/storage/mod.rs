//! Storage backend implementations.
//!
//! This module provides concrete implementations of the `PatientRepository`
//! trait defined in `carenotes_core::storage`. The implementation is selected
//! at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): process-local store, lost on restart
//! - `dynamodb`: single-table DynamoDB backend using `aws-sdk-dynamodb`
//!
//! These features are mutually exclusive.
//!
//! # Examples
//!
//! Build with DynamoDB:
//! ```bash
//! cargo build -p carenotes --no-default-features --features dynamodb
//! ```

#[cfg(all(feature = "inmemory", feature = "dynamodb"))]
compile_error!(
    "Features 'inmemory' and 'dynamodb' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'dynamodb' feature. \
    Example: cargo build -p carenotes --no-default-features --features dynamodb"
);

// Handler tests always run against the in-memory store.
#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(any(feature = "inmemory", test))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "dynamodb")]
pub use dynamodb::{AwsSettings, DynamoDbRepository};
