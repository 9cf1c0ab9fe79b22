//! Synchronization engine
//!
//! `SyncEngine` owns a search index, the mirror store and the projection.
//! Every mutation goes through it, so the mirror and the index always hold
//! the same set of identities at operation boundaries.
//!
//! # Ordering
//!
//! - Single-document operations call the index first and touch the mirror
//!   only once the index accepted the change. A rejected call leaves both
//!   containers as they were.
//! - Batch adds merge the mirror first, then call the index. An index
//!   failure after the merge is returned unchanged and the containers are
//!   left out of step; there is no rollback.
//! - `add_all_async` merges the mirror before it returns. The index catches
//!   up in the returned future, so searches issued meanwhile can miss
//!   documents the mirror already holds (mirror leads index).
//! - `remove_all(None)` bumps a clear epoch. A pending asynchronous add
//!   checks it before each chunk and stops once it moved, so a clear is
//!   not followed by stale documents reappearing in the index. On a
//!   multi-threaded runtime the chunk already being indexed when the clear
//!   lands can still end up indexed without a mirror entry.

use crate::mirror::MirrorStore;
use crate::projection::{Projection, SearchState};
use mirrorsearch_core::{
    Config, Document, DocumentId, EngineConfig, Error, IdentityExtractor, Result, SearchIndex,
    SearchOptions, SuggestOptions, DEFAULT_CHUNK_SIZE,
};
use mirrorsearch_search::MemoryIndex;
use std::borrow::Cow;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

// ============================================================================
// Options
// ============================================================================

/// Options for [`SyncEngine::add_all_async`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddAllOptions {
    /// Documents indexed between cooperative yields (zero is treated as one)
    pub chunk_size: usize,
}

impl Default for AddAllOptions {
    fn default() -> Self {
        AddAllOptions {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl AddAllOptions {
    /// Options with the given chunk size
    pub fn chunk_size(chunk_size: usize) -> Self {
        AddAllOptions { chunk_size }
    }
}

/// Options for [`SyncEngine::remove_all`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveAllOptions {
    /// Skip documents whose identity is not mirrored instead of passing
    /// them to the index
    pub ignore_if_missing: bool,
}

impl RemoveAllOptions {
    /// Options that skip unknown documents
    pub fn ignore_if_missing() -> Self {
        RemoveAllOptions {
            ignore_if_missing: true,
        }
    }
}

// ============================================================================
// SyncEngine
// ============================================================================

/// Keeps a search index and its mirror store coherent
///
/// Mutations take `&mut self`, queries take `&self`. The engine is the
/// snapshot interface handed to a UI layer: mutation methods, the
/// projected [`SearchState`], and a handle to the index.
pub struct SyncEngine<T, I = MemoryIndex<T>>
where
    T: Clone + Send + Sync + 'static,
    I: SearchIndex<T>,
{
    config: EngineConfig,
    extractor: IdentityExtractor<T>,
    index: Arc<I>,
    mirror: MirrorStore<T>,
    projection: Arc<Projection<T>>,
    /// Bumped by every full clear; pending async adds stop when it moves
    clear_epoch: Arc<AtomicU64>,
}

impl<T> SyncEngine<T, MemoryIndex<T>>
where
    T: Document + Clone + Send + Sync + 'static,
{
    /// Engine over a fresh [`MemoryIndex`], reading fields through [`Document`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn in_memory(config: &Config) -> Result<Self> {
        let extractor = IdentityExtractor::new(config.engine.id_field.clone());
        Self::in_memory_with_extractor(config, extractor)
    }
}

impl<T> SyncEngine<T, MemoryIndex<T>>
where
    T: Clone + Send + Sync + 'static,
{
    /// Engine over a fresh [`MemoryIndex`] with a custom extraction strategy
    pub fn in_memory_with_extractor(
        config: &Config,
        extractor: IdentityExtractor<T>,
    ) -> Result<Self> {
        config.validate()?;
        let index = MemoryIndex::new(config.index.clone(), extractor);
        Self::new(config.engine.clone(), index)
    }
}

impl<T, I> SyncEngine<T, I>
where
    T: Clone + Send + Sync + 'static,
    I: SearchIndex<T>,
{
    /// Wrap an index
    ///
    /// The engine adopts the index's identity strategy. The index should be
    /// empty: documents already in it have no mirror entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid or names a
    /// different id field than the index extracts.
    pub fn new(config: EngineConfig, index: I) -> Result<Self> {
        config.validate()?;
        let extractor = index.extractor().clone();
        if extractor.id_field() != config.id_field {
            return Err(Error::Config(format!(
                "engine id_field '{}' does not match index id_field '{}'",
                config.id_field,
                extractor.id_field()
            )));
        }
        if index.document_count() != 0 {
            warn!(
                target: "mirrorsearch::engine",
                count = index.document_count(),
                "Index is not empty; existing documents cannot be materialized"
            );
        }

        Ok(SyncEngine {
            config,
            extractor,
            index: Arc::new(index),
            mirror: MirrorStore::new(),
            projection: Arc::new(Projection::new()),
            clear_epoch: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Wrap an index and seed it with an initial document set
    pub fn with_documents(config: EngineConfig, index: I, docs: Vec<T>) -> Result<Self> {
        let mut engine = Self::new(config, index)?;
        engine.add_all(docs)?;
        Ok(engine)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Search and publish materialized results
    ///
    /// Hit order is the index's. A hit whose identity is not mirrored
    /// materializes to `None`.
    ///
    /// # Errors
    ///
    /// Index failures are returned unchanged and the projection is left as
    /// it was.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<()> {
        let raw = self.index.search(query, options)?;
        let results = raw
            .iter()
            .map(|hit| {
                let doc = self.mirror.get(&hit.id).cloned();
                if doc.is_none() {
                    warn!(target: "mirrorsearch::engine", id = %hit.id, "Search hit has no mirrored document");
                }
                doc
            })
            .collect();
        self.projection.set_results(raw, results);
        Ok(())
    }

    /// Suggest query completions and publish them
    pub fn auto_suggest(&self, query: &str, options: &SuggestOptions) -> Result<()> {
        let suggestions = self.index.suggest(query, options)?;
        self.projection.set_suggestions(suggestions);
        Ok(())
    }

    /// Reset published search results
    pub fn clear_results(&self) {
        self.projection.clear_results();
    }

    /// Reset published suggestions
    pub fn clear_suggestions(&self) {
        self.projection.clear_suggestions();
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add one document
    ///
    /// Duplicate identities are the index's call: if it accepts one, the
    /// mirror entry is overwritten; if it rejects it, nothing changes.
    pub fn add(&mut self, doc: T) -> Result<()> {
        let id = self.extractor.extract(&doc);
        self.index.add(&doc)?;
        debug!(target: "mirrorsearch::engine", id = %id, "Document added");
        self.mirror.set(id, Arc::new(doc));
        Ok(())
    }

    /// Add a batch of documents
    ///
    /// The mirror is merged in one pass before the index is called.
    pub fn add_all(&mut self, docs: Vec<T>) -> Result<()> {
        let batch = self.prepare_batch(&docs);
        self.mirror.merge(batch);
        self.index.add_all(&docs)?;
        debug!(target: "mirrorsearch::engine", count = docs.len(), "Batch added");
        Ok(())
    }

    /// Add a batch, populating the index asynchronously in chunks
    ///
    /// Before returning, the mirror is merged and the indexing flag raised.
    /// The returned future drives the index and resolves when it settles;
    /// the flag drops at that point whether the add succeeded or failed.
    /// Dropping the future abandons the remaining chunks, and so does a
    /// `remove_all(None)` issued while it is pending (the future then
    /// resolves to `Ok`).
    ///
    /// The future does not borrow the engine: other operations may run
    /// while it is pending.
    ///
    /// # Errors
    ///
    /// The future resolves to [`Error::AsyncIndexing`] if the index fails.
    pub fn add_all_async(
        &mut self,
        docs: Vec<T>,
        options: AddAllOptions,
    ) -> impl Future<Output = Result<()>> + Send + 'static {
        let batch = self.prepare_batch(&docs);
        self.mirror.merge(batch);

        let guard = self.projection.begin_indexing();
        let index = Arc::clone(&self.index);
        let clear_epoch = Arc::clone(&self.clear_epoch);
        let epoch = clear_epoch.load(Ordering::Acquire);
        let chunk_size = options.chunk_size.max(1);
        let count = docs.len();
        debug!(target: "mirrorsearch::engine", count, chunk_size, "Asynchronous indexing started");

        async move {
            let _guard = guard;
            let mut pending = docs;
            while !pending.is_empty() {
                if clear_epoch.load(Ordering::Acquire) != epoch {
                    debug!(
                        target: "mirrorsearch::engine",
                        count,
                        remaining = pending.len(),
                        "Asynchronous indexing abandoned after clear"
                    );
                    return Ok(());
                }

                let rest = pending.split_off(chunk_size.min(pending.len()));
                let chunk = std::mem::replace(&mut pending, rest);
                if let Err(e) = index.add_all_chunked(chunk, chunk_size).await {
                    warn!(target: "mirrorsearch::engine", count, error = %e, "Asynchronous indexing failed");
                    return Err(Error::AsyncIndexing(e));
                }
            }
            debug!(target: "mirrorsearch::engine", count, "Asynchronous indexing finished");
            Ok(())
        }
    }

    /// [`add_all_async`](Self::add_all_async) with the configured chunk size
    pub fn add_all_async_default(
        &mut self,
        docs: Vec<T>,
    ) -> impl Future<Output = Result<()>> + Send + 'static {
        let options = AddAllOptions::chunk_size(self.config.chunk_size);
        self.add_all_async(docs, options)
    }

    /// Replace the mirrored document sharing `doc`'s identity
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no document has this identity. If the
    /// index rejects the new document, the identity is left absent from
    /// both containers.
    pub fn replace(&mut self, doc: T) -> Result<()> {
        let id = self.extractor.extract(&doc);
        let old = self
            .mirror
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.clone()))?;

        self.index.remove(&old)?;
        if let Err(e) = self.index.add(&doc) {
            self.mirror.delete_one(&id);
            return Err(e.into());
        }
        debug!(target: "mirrorsearch::engine", id = %id, "Document replaced");
        self.mirror.set(id, Arc::new(doc));
        Ok(())
    }

    /// Remove a document
    ///
    /// The index receives the full document.
    pub fn remove(&mut self, doc: &T) -> Result<()> {
        let id = self.extractor.extract(doc);
        self.index.remove(doc)?;
        self.mirror.delete_one(&id);
        debug!(target: "mirrorsearch::engine", id = %id, "Document removed");
        Ok(())
    }

    /// Remove a document by identity
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the identity is not mirrored; nothing
    /// is changed in that case.
    pub fn remove_by_id(&mut self, id: &DocumentId) -> Result<()> {
        let doc = self
            .mirror
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.clone()))?;
        self.index.remove(&doc)?;
        self.mirror.delete_one(id);
        debug!(target: "mirrorsearch::engine", id = %id, "Document removed");
        Ok(())
    }

    /// Remove the given documents, or everything when `docs` is None
    ///
    /// With `ignore_if_missing`, documents whose identity is not mirrored
    /// are skipped; otherwise they reach the index, which may reject them.
    /// The mirror is only touched once the index accepted the whole list.
    pub fn remove_all(&mut self, docs: Option<&[T]>, options: RemoveAllOptions) -> Result<()> {
        let Some(docs) = docs else {
            self.clear_epoch.fetch_add(1, Ordering::AcqRel);
            self.index.remove_all(None)?;
            self.mirror.clear();
            debug!(target: "mirrorsearch::engine", "All documents removed");
            return Ok(());
        };

        let docs: Cow<'_, [T]> = if options.ignore_if_missing {
            Cow::Owned(
                docs.iter()
                    .filter(|doc| self.mirror.contains(&self.extractor.extract(doc)))
                    .cloned()
                    .collect(),
            )
        } else {
            Cow::Borrowed(docs)
        };
        if docs.is_empty() {
            return Ok(());
        }

        let ids: Vec<DocumentId> = docs.iter().map(|doc| self.extractor.extract(doc)).collect();
        self.index.remove_all(Some(&*docs))?;
        self.mirror.delete_many(&ids);
        debug!(target: "mirrorsearch::engine", count = ids.len(), "Documents removed");
        Ok(())
    }

    fn prepare_batch(&self, docs: &[T]) -> Vec<(DocumentId, Arc<T>)> {
        docs.iter()
            .map(|doc| (self.extractor.extract(doc), Arc::new(doc.clone())))
            .collect()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Mirrored document for an identity
    pub fn get(&self, id: &DocumentId) -> Option<Arc<T>> {
        self.mirror.get(id).cloned()
    }

    /// Check whether an identity is mirrored
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.mirror.contains(id)
    }

    /// Number of mirrored documents
    pub fn document_count(&self) -> usize {
        self.mirror.len()
    }

    /// Read-only view of the mirror
    pub fn mirror(&self) -> &MirrorStore<T> {
        &self.mirror
    }

    /// True while an asynchronous add is in flight
    pub fn is_indexing(&self) -> bool {
        self.projection.is_indexing()
    }

    /// Clone of the projected state
    pub fn state(&self) -> SearchState<T> {
        self.projection.snapshot()
    }

    /// Receiver for projected state changes
    pub fn subscribe(&self) -> watch::Receiver<SearchState<T>> {
        self.projection.subscribe()
    }

    /// Handle to the underlying index
    ///
    /// Writing through it bypasses the mirror.
    pub fn index(&self) -> &Arc<I> {
        &self.index
    }

    /// Identity strategy in use
    pub fn extractor(&self) -> &IdentityExtractor<T> {
        &self.extractor
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
