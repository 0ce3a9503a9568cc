//! Error types for the calamus library.

use thiserror::Error;

/// Errors surfaced by index construction, mutation, and querying.
///
/// All variants are synchronous, caller-visible failures raised at the
/// point of the bad input; nothing is retried internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalamusError {
    /// Invalid argument error (negative or duplicate document id,
    /// malformed stop-word set).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Document text failed validation.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Query text failed parsing or validation.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Operation addressed a document id that is not live.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl CalamusError {
    /// Create an invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        CalamusError::InvalidArgument(msg.into())
    }

    /// Create an invalid document error.
    pub fn invalid_document<S: Into<String>>(msg: S) -> Self {
        CalamusError::InvalidDocument(msg.into())
    }

    /// Create an invalid query error.
    pub fn invalid_query<S: Into<String>>(msg: S) -> Self {
        CalamusError::InvalidQuery(msg.into())
    }

    /// Create a not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        CalamusError::NotFound(msg.into())
    }
}

/// Result type for calamus operations.
pub type Result<T> = std::result::Result<T, CalamusError>;
