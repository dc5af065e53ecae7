//! In-memory storage backend.
//!
//! Patient rows live in a `HashMap` keyed by id, wrapped in `Arc<RwLock<_>>`.
//! Nothing is persisted. Useful for local development and for tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use carenotes::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new();
//! ```

mod repository;

pub use repository::InMemoryRepository;
