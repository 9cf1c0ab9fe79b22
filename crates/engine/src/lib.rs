//! Synchronization engine for mirrorsearch
//!
//! This crate binds a [`SearchIndex`](mirrorsearch_core::SearchIndex) to an
//! observable state store:
//! - MirrorStore: identity -> document, so hits can be materialized
//! - Projection: watch channel carrying results, suggestions and the
//!   indexing flag
//! - SyncEngine: the only writer of both, keeping them coherent
//!
//! The engine is the only component that knows about:
//! - Ordering between index and mirror updates
//! - Asynchronous bulk adds and the indexing flag

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod mirror;
pub mod projection;

pub use engine::{AddAllOptions, RemoveAllOptions, SyncEngine};
pub use mirror::MirrorStore;
pub use projection::{IndexingGuard, Projection, SearchState};
