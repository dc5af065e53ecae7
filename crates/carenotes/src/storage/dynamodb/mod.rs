//! DynamoDB storage backend implementation.
//!
//! Single-table layout: every patient is one item keyed by (`id`,
//! `type` = "Patient") and carries its notes as an embedded list attribute.

mod client;
mod conversions;
mod error;
mod expressions;
mod keys;
mod repository;

pub use client::AwsSettings;
pub use repository::DynamoDbRepository;
