//! Functional core for the carenotes patient records handler.
//!
//! Pure data and pure functions. Timestamps are passed in by callers; store
//! access lives behind the [`storage::PatientRepository`] trait and is
//! implemented in the `carenotes` shell.

pub mod envelope;
pub mod patient;
pub mod routing;
pub mod serde;
pub mod storage;
