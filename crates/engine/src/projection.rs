//! Reactive projection of engine state
//!
//! The engine publishes query results, suggestions and the indexing flag
//! into a `tokio::sync::watch` channel. Consumers (UI layers, tests) hold a
//! receiver and react to changes; they never see the mirror or the index.
//!
//! The indexing flag is derived from a count of in-flight asynchronous adds
//! so overlapping bulk adds keep it raised until the last one settles.

use mirrorsearch_core::{SearchResult, Suggestion};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

// ============================================================================
// SearchState
// ============================================================================

/// Snapshot of everything a consumer renders
///
/// `None` fields mean no query has been issued since the last clear.
#[derive(Debug)]
pub struct SearchState<T> {
    /// Materialized documents, aligned with `raw_results`
    ///
    /// A `None` slot marks a hit whose identity was missing from the mirror.
    pub results: Option<Vec<Option<Arc<T>>>>,

    /// Raw hits in index order
    pub raw_results: Option<Vec<SearchResult>>,

    /// Suggestions from the last auto-suggest
    pub suggestions: Option<Vec<Suggestion>>,

    /// True while an asynchronous bulk add is in flight
    pub is_indexing: bool,
}

impl<T> Clone for SearchState<T> {
    fn clone(&self) -> Self {
        SearchState {
            results: self.results.clone(),
            raw_results: self.raw_results.clone(),
            suggestions: self.suggestions.clone(),
            is_indexing: self.is_indexing,
        }
    }
}

impl<T> Default for SearchState<T> {
    fn default() -> Self {
        SearchState {
            results: None,
            raw_results: None,
            suggestions: None,
            is_indexing: false,
        }
    }
}

impl<T> SearchState<T> {
    /// Materialized documents of the last search, skipping missing slots
    pub fn documents(&self) -> impl Iterator<Item = &Arc<T>> + '_ {
        self.results.iter().flatten().flatten()
    }
}

// ============================================================================
// Projection
// ============================================================================

/// Publisher side of the projection
pub struct Projection<T> {
    tx: watch::Sender<SearchState<T>>,
    in_flight: AtomicUsize,
}

impl<T> Default for Projection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Projection<T> {
    /// Create a projection with empty state
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SearchState::default());
        Projection {
            tx,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// New receiver starting at the current state
    pub fn subscribe(&self) -> watch::Receiver<SearchState<T>> {
        self.tx.subscribe()
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> SearchState<T> {
        self.tx.borrow().clone()
    }

    /// Current indexing flag
    pub fn is_indexing(&self) -> bool {
        self.tx.borrow().is_indexing
    }

    /// Publish search results
    pub fn set_results(&self, raw: Vec<SearchResult>, results: Vec<Option<Arc<T>>>) {
        self.tx.send_modify(|state| {
            state.raw_results = Some(raw);
            state.results = Some(results);
        });
    }

    /// Publish suggestions
    pub fn set_suggestions(&self, suggestions: Vec<Suggestion>) {
        self.tx.send_modify(|state| state.suggestions = Some(suggestions));
    }

    /// Reset search results
    pub fn clear_results(&self) {
        self.tx.send_modify(|state| {
            state.raw_results = None;
            state.results = None;
        });
    }

    /// Reset suggestions
    pub fn clear_suggestions(&self) {
        self.tx.send_modify(|state| state.suggestions = None);
    }

    /// Register an asynchronous add and raise the flag
    ///
    /// The returned guard lowers the flag when dropped, unless another add
    /// is still in flight.
    pub fn begin_indexing(self: &Arc<Self>) -> IndexingGuard<T> {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        self.tx.send_if_modified(|state| {
            let changed = !state.is_indexing;
            state.is_indexing = true;
            changed
        });
        IndexingGuard {
            projection: Arc::clone(self),
        }
    }

    fn finish_indexing(&self) {
        let remaining = self.in_flight.fetch_sub(1, Ordering::AcqRel) - 1;
        if remaining == 0 {
            self.tx.send_if_modified(|state| {
                let changed = state.is_indexing;
                state.is_indexing = false;
                changed
            });
        }
    }
}

/// Keeps the indexing flag raised while alive
#[must_use = "dropping the guard lowers the indexing flag"]
pub struct IndexingGuard<T> {
    projection: Arc<Projection<T>>,
}

impl<T> Drop for IndexingGuard<T> {
    fn drop(&mut self) {
        self.projection.finish_indexing();
    }
}
