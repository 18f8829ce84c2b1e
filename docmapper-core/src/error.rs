//! Error types and result types for aggregate store operations.
//!
//! This module provides the error handling surface for the whole mapping
//! layer. Use [`AggregateStoreResult<T>`] as the return type for fallible
//! operations.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when mapping aggregates to
/// and from a document store.
///
/// Every error propagates synchronously to the immediate caller; nothing is
/// swallowed or retried inside the mapper. The one deliberate exception is
/// [`AggregateManager::find_optional`](crate::manager::AggregateManager::find_optional),
/// which converts a `NotFound` into `Ok(None)`.
#[derive(Error, Debug)]
pub enum AggregateStoreError {
    /// No document exists under the given storage key.
    #[error("Document not found: {0}")]
    NotFound(String),
    /// Serialization/deserialization error, including a stored body whose
    /// shape does not match the target aggregate type.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The requested operation needs per-type configuration the aggregate
    /// type does not declare (e.g. a criteria query against an untagged type).
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// A construction-time invariant was violated by a caller-supplied value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Error during gateway initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// An error surfaced by the underlying store gateway.
    #[error("Gateway error: {0}")]
    Gateway(String),
}

/// A specialized `Result` type for aggregate store operations.
pub type AggregateStoreResult<T> = Result<T, AggregateStoreError>;

impl From<SerdeJsonError> for AggregateStoreError {
    fn from(err: SerdeJsonError) -> Self {
        AggregateStoreError::Serialization(err.to_string())
    }
}
