//! Core types and traits for mirrorsearch
//!
//! This crate defines the foundational types used throughout the system:
//! - DocumentId: identity of a document across index and mirror
//! - IdentityExtractor: pluggable document -> identity strategy
//! - SearchIndex: trait for the external full-text index
//! - SearchOptions, SearchResult, Suggestion: query types
//! - Config: engine and index configuration
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod identity;
pub mod search_types;
pub mod traits;
pub mod types;

pub use config::{Config, EngineConfig, IndexConfig, DEFAULT_CHUNK_SIZE, DEFAULT_SUGGEST_LIMIT};
pub use error::{Error, IndexError, IndexResult, Result};
pub use identity::{Document, ExtractFieldFn, IdentityExtractor, DEFAULT_ID_FIELD};
pub use search_types::{CombineWith, SearchOptions, SearchResult, SuggestOptions, Suggestion};
pub use traits::SearchIndex;
pub use types::{DocumentId, FieldValue};
