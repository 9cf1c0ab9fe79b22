//! Error types for mirrorsearch
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Two layers:
//! - [`IndexError`]: failures raised by a [`SearchIndex`](crate::traits::SearchIndex)
//!   implementation. The synchronization engine never rewrites these.
//! - [`Error`]: what engine operations return. Index failures pass through
//!   transparently; the engine only adds `NotFound` where it knows something
//!   the index does not.

use crate::types::DocumentId;
use thiserror::Error;

/// Result type alias for mirrorsearch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for search index operations
pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Errors raised by a search index implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A document with this identity is already indexed
    #[error("duplicate document id: {0}")]
    DuplicateId(DocumentId),

    /// The index has no document with this identity
    #[error("document not in index: {0}")]
    UnknownDocument(DocumentId),

    /// The query could not be interpreted
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Any other index-specific failure
    #[error("index error: {0}")]
    Other(String),
}

/// Error types for engine operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No mirrored document has this identity
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    /// The index rejected a synchronous operation
    #[error(transparent)]
    Index(#[from] IndexError),

    /// The chunked asynchronous add failed part-way
    #[error("asynchronous indexing failed: {0}")]
    AsyncIndexing(#[source] IndexError),

    /// Configuration is invalid or could not be parsed
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Returns true for [`Error::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// The underlying index error, if this error came from the index
    pub fn index_error(&self) -> Option<&IndexError> {
        match self {
            Error::Index(e) | Error::AsyncIndexing(e) => Some(e),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound(DocumentId::Number(7));
        let msg = err.to_string();
        assert!(msg.contains("document not found"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn test_index_error_is_transparent() {
        let inner = IndexError::DuplicateId(DocumentId::from("a"));
        let err: Error = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err.index_error(), Some(&inner));
    }

    #[test]
    fn test_error_display_async_indexing() {
        let err = Error::AsyncIndexing(IndexError::Other("boom".to_string()));
        let msg = err.to_string();
        assert!(msg.contains("asynchronous indexing failed"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;

        let err = Error::AsyncIndexing(IndexError::UnknownDocument(DocumentId::Null));
        assert!(err.source().is_some());
        assert!(Error::NotFound(DocumentId::Null).source().is_none());
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::NotFound(DocumentId::Null).is_not_found());
        assert!(!Error::Config("x".to_string()).is_not_found());
    }

    #[test]
    fn test_error_from_toml() {
        let parsed: std::result::Result<toml::Table, _> = toml::from_str("= broken");
        let err: Error = parsed.unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }
}
