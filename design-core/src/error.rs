//! Error types for document operations.

use thiserror::Error;

/// Result type for design document operations.
pub type DesignResult<T> = Result<T, DesignError>;

/// Errors that can occur while loading or decoding design documents.
///
/// Malformed *content* (unknown kinds, missing groups, bad interaction
/// config) is never an error; it degrades to an empty render instead.
#[derive(Debug, Error)]
pub enum DesignError {
    /// No document exists for the given id or share token.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// The document exists but is not shared with the caller.
    #[error("Document not shared: {0}")]
    NotShared(String),

    /// Lookup failed for a reason that may succeed on retry.
    #[error("Transient lookup failure: {0}")]
    Transient(String),

    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while reading a document source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DesignError {
    /// Whether retrying the same lookup may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Whether this error means the document is unavailable to the caller.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NotShared(_))
    }
}
