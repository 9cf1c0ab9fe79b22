//! mirrorsearch - keep a full-text index and an observable document store in sync
//!
//! A search index returns identities, not documents. mirrorsearch keeps a
//! mirror of every indexed document keyed by the same identity, routes all
//! mutations through one engine so the two never disagree, and publishes
//! materialized results to subscribers.
//!
//! # Quick Start
//!
//! ```
//! use mirrorsearch::{Config, DocumentId, SearchOptions, SyncEngine};
//! use serde_json::{json, Value};
//!
//! let mut engine: SyncEngine<Value> = SyncEngine::in_memory(&Config::default())?;
//! engine.add(json!({"id": 1, "text": "red fox"}))?;
//! engine.add(json!({"id": 2, "text": "blue dog"}))?;
//!
//! engine.search("fox", &SearchOptions::default())?;
//! let state = engine.state();
//! let found: Vec<&Value> = state.documents().map(|d| d.as_ref()).collect();
//! assert_eq!(found, vec![&json!({"id": 1, "text": "red fox"})]);
//!
//! engine.remove_by_id(&DocumentId::from(1))?;
//! # Ok::<(), mirrorsearch::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `mirrorsearch-core`: identities, the [`SearchIndex`] trait, options,
//!   configuration and errors
//! - `mirrorsearch-search`: [`MemoryIndex`], an in-memory BM25 index
//! - `mirrorsearch-engine`: [`SyncEngine`], the mirror and the projection

pub use mirrorsearch_core::*;
pub use mirrorsearch_engine::{
    AddAllOptions, IndexingGuard, MirrorStore, Projection, RemoveAllOptions, SearchState,
    SyncEngine,
};
pub use mirrorsearch_search::MemoryIndex;
