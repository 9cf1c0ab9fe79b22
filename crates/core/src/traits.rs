//! Core trait for the search index abstraction
//!
//! This module defines the SearchIndex trait that lets the synchronization
//! engine drive any full-text index without knowing how it tokenizes or
//! ranks. The engine owns one index per instance and never shares it with
//! another engine.

use crate::error::IndexResult;
use crate::identity::IdentityExtractor;
use crate::search_types::{SearchOptions, SearchResult, SuggestOptions, Suggestion};
use crate::types::DocumentId;
use async_trait::async_trait;

/// External full-text index keyed by document identity
///
/// Implementations use interior mutability: the chunked asynchronous add
/// runs while the owning engine keeps serving queries, so every method
/// takes `&self`.
///
/// # Errors
///
/// Every failure is reported as an [`IndexError`](crate::IndexError) and is
/// handed to the caller unchanged. Implementations decide their own policy
/// for duplicate identities and unknown documents.
#[async_trait]
pub trait SearchIndex<T>: Send + Sync + 'static
where
    T: Send + Sync + 'static,
{
    /// Identity strategy used by this index
    ///
    /// The engine adopts it so index and mirror agree on identities.
    fn extractor(&self) -> &IdentityExtractor<T>;

    /// Index one document
    fn add(&self, doc: &T) -> IndexResult<()>;

    /// Index a batch of documents
    fn add_all(&self, docs: &[T]) -> IndexResult<()>;

    /// Index a batch in chunks, yielding to the scheduler between chunks
    async fn add_all_chunked(&self, docs: Vec<T>, chunk_size: usize) -> IndexResult<()>;

    /// Remove a document
    ///
    /// Receives the full document, not just its identity, since an index
    /// may need the field contents to find its postings.
    fn remove(&self, doc: &T) -> IndexResult<()>;

    /// Remove the given documents, or everything when `docs` is None
    fn remove_all(&self, docs: Option<&[T]>) -> IndexResult<()>;

    /// Ranked hits for a query
    fn search(&self, query: &str, options: &SearchOptions) -> IndexResult<Vec<SearchResult>>;

    /// Ranked query completions
    fn suggest(&self, query: &str, options: &SuggestOptions) -> IndexResult<Vec<Suggestion>>;

    /// Check whether an identity is indexed
    fn contains(&self, id: &DocumentId) -> bool;

    /// Number of indexed documents
    fn document_count(&self) -> usize;
}
