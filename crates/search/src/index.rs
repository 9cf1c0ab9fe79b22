//! Inverted index keyed by document identity
//!
//! This module provides:
//! - PostingEntry / PostingList: per-term document lists with term statistics
//! - InvertedIndex: term -> postings, per-document term lists, corpus stats
//! - Version watermark bumped on every mutation
//!
//! The index stores identities and statistics only, never document content.
//! Callers (see [`MemoryIndex`](crate::MemoryIndex)) enforce identity
//! uniqueness; `index_document` on an indexed identity replaces it.

use dashmap::DashMap;
use mirrorsearch_core::DocumentId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

// ============================================================================
// PostingEntry
// ============================================================================

/// Entry in a posting list
#[derive(Debug, Clone, PartialEq)]
pub struct PostingEntry {
    /// Identity of the source document
    pub id: DocumentId,
    /// Term frequency in this document
    pub tf: u32,
    /// Document length in tokens
    pub doc_len: u32,
    /// Insertion sequence of the document, used for stable ordering
    pub seq: u64,
}

impl PostingEntry {
    /// Create a new posting entry
    pub fn new(id: DocumentId, tf: u32, doc_len: u32, seq: u64) -> Self {
        PostingEntry {
            id,
            tf,
            doc_len,
            seq,
        }
    }
}

// ============================================================================
// PostingList
// ============================================================================

/// List of documents containing a term
#[derive(Debug, Clone, Default)]
pub struct PostingList {
    /// Document entries
    pub entries: Vec<PostingEntry>,
}

impl PostingList {
    /// Create a new empty posting list
    pub fn new() -> Self {
        PostingList { entries: vec![] }
    }

    /// Add an entry to the posting list
    pub fn add(&mut self, entry: PostingEntry) {
        self.entries.push(entry);
    }

    /// Remove entries for an identity
    pub fn remove(&mut self, id: &DocumentId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| &e.id != id);
        before - self.entries.len()
    }

    /// Number of documents containing this term
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if posting list is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// InvertedIndex
// ============================================================================

#[derive(Debug, Clone)]
struct IndexedDoc {
    terms: Vec<String>,
    len: u32,
    seq: u64,
}

/// Inverted index for keyword search
///
/// # Thread Safety
///
/// Uses DashMap for concurrent access. Individual updates are not atomic
/// with respect to each other; [`MemoryIndex`](crate::MemoryIndex)
/// serializes writers.
pub struct InvertedIndex {
    /// Term -> PostingList mapping
    postings: DashMap<String, PostingList>,

    /// Identity -> indexed terms, length and sequence
    docs: DashMap<DocumentId, IndexedDoc>,

    /// Sum of all document lengths (for average calculation)
    total_doc_len: AtomicUsize,

    /// Next insertion sequence
    next_seq: AtomicU64,

    /// Version watermark for consistency
    version: AtomicU64,
}

impl Default for InvertedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl InvertedIndex {
    /// Create an empty index
    pub fn new() -> Self {
        InvertedIndex {
            postings: DashMap::new(),
            docs: DashMap::new(),
            total_doc_len: AtomicUsize::new(0),
            next_seq: AtomicU64::new(0),
            version: AtomicU64::new(0),
        }
    }

    /// Clear all index data
    pub fn clear(&self) {
        self.postings.clear();
        self.docs.clear();
        self.total_doc_len.store(0, Ordering::Relaxed);
        self.version.fetch_add(1, Ordering::Release);
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Get current version
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Get total number of indexed documents
    pub fn total_docs(&self) -> usize {
        self.docs.len()
    }

    /// Get document frequency for a term
    pub fn doc_freq(&self, term: &str) -> usize {
        self.postings.get(term).map(|r| r.len()).unwrap_or(0)
    }

    /// Get average document length
    pub fn avg_doc_len(&self) -> f64 {
        let total = self.docs.len();
        if total == 0 {
            return 0.0;
        }
        self.total_doc_len.load(Ordering::Acquire) as f64 / total as f64
    }

    /// Check whether an identity is indexed
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.docs.contains_key(id)
    }

    /// Insertion sequence of an indexed identity
    pub fn seq_of(&self, id: &DocumentId) -> Option<u64> {
        self.docs.get(id).map(|d| d.seq)
    }

    /// All indexed identities in insertion order
    pub fn ids(&self) -> Vec<DocumentId> {
        let mut ids: Vec<(u64, DocumentId)> = self
            .docs
            .iter()
            .map(|r| (r.value().seq, r.key().clone()))
            .collect();
        ids.sort_by_key(|(seq, _)| *seq);
        ids.into_iter().map(|(_, id)| id).collect()
    }

    // ========================================================================
    // Index Updates
    // ========================================================================

    /// Index a document's tokens under an identity
    ///
    /// If the identity is already indexed, the old entry is removed first.
    pub fn index_document(&self, id: &DocumentId, tokens: &[String]) {
        if self.docs.contains_key(id) {
            self.remove_document(id);
        }

        let doc_len = tokens.len() as u32;
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);

        let mut tf_map: HashMap<&str, u32> = HashMap::new();
        for token in tokens {
            *tf_map.entry(token.as_str()).or_insert(0) += 1;
        }

        let mut terms = Vec::with_capacity(tf_map.len());
        for (term, tf) in tf_map {
            let entry = PostingEntry::new(id.clone(), tf, doc_len, seq);
            self.postings.entry(term.to_string()).or_default().add(entry);
            terms.push(term.to_string());
        }

        self.docs.insert(
            id.clone(),
            IndexedDoc {
                terms,
                len: doc_len,
                seq,
            },
        );
        self.total_doc_len
            .fetch_add(doc_len as usize, Ordering::Relaxed);
        self.version.fetch_add(1, Ordering::Release);
    }

    /// Remove a document from the index
    ///
    /// Returns false if the identity was not indexed.
    pub fn remove_document(&self, id: &DocumentId) -> bool {
        let Some((_, doc)) = self.docs.remove(id) else {
            return false;
        };

        for term in &doc.terms {
            if let Some(mut list) = self.postings.get_mut(term) {
                list.remove(id);
            }
            self.postings.remove_if(term, |_, list| list.is_empty());
        }

        self.total_doc_len
            .fetch_sub(doc.len as usize, Ordering::Relaxed);
        self.version.fetch_add(1, Ordering::Release);
        true
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Lookup documents containing a term
    pub fn lookup(&self, term: &str) -> Option<PostingList> {
        self.postings.get(term).map(|r| r.clone())
    }

    /// Indexed terms starting with `prefix`, sorted
    pub fn terms_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut terms: Vec<String> = self
            .postings
            .iter()
            .filter(|r| r.key().starts_with(prefix))
            .map(|r| r.key().clone())
            .collect();
        terms.sort();
        terms
    }

    /// Get all terms in the index
    pub fn terms(&self) -> Vec<String> {
        self.postings.iter().map(|r| r.key().clone()).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
