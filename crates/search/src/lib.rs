//! In-memory search index for mirrorsearch
//!
//! This crate provides:
//! - Basic tokenizer
//! - BM25 scorer and ScorerContext
//! - InvertedIndex with posting lists and a version watermark
//! - MemoryIndex, a [`SearchIndex`](mirrorsearch_core::SearchIndex) implementation
//!
//! # Usage
//!
//! ```
//! use mirrorsearch_core::{IdentityExtractor, IndexConfig, SearchIndex, SearchOptions};
//! use mirrorsearch_search::MemoryIndex;
//! use serde_json::json;
//!
//! let index = MemoryIndex::new(IndexConfig::default(), IdentityExtractor::default());
//! index.add(&json!({"id": 1, "text": "red fox"})).unwrap();
//!
//! let hits = index.search("fox", &SearchOptions::default()).unwrap();
//! assert_eq!(hits.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod memory;
pub mod scorer;
pub mod tokenizer;

pub use index::{InvertedIndex, PostingEntry, PostingList};
pub use memory::MemoryIndex;
pub use scorer::{Bm25Scorer, ScorerContext};
pub use tokenizer::{tokenize, tokenize_unique};
