//! In-memory implementation of [`SearchIndex`]
//!
//! `MemoryIndex` reads the configured text fields of each document through
//! the shared [`IdentityExtractor`], tokenizes them into an
//! [`InvertedIndex`] and ranks with BM25.
//!
//! # Identity policy
//!
//! - `add` / `add_all` reject an identity that is already indexed
//!   ([`IndexError::DuplicateId`]); `add_all` checks the whole batch first.
//! - `remove` / `remove_all` reject an identity that is not indexed
//!   ([`IndexError::UnknownDocument`]); `remove_all` checks the whole list
//!   first.

use crate::index::InvertedIndex;
use crate::scorer::{Bm25Scorer, ScorerContext};
use crate::tokenizer::{tokenize, tokenize_unique};
use async_trait::async_trait;
use mirrorsearch_core::{
    CombineWith, DocumentId, FieldValue, IdentityExtractor, IndexConfig, IndexError, IndexResult,
    SearchIndex, SearchOptions, SearchResult, SuggestOptions, Suggestion,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, warn};

// ============================================================================
// MemoryIndex
// ============================================================================

/// Reference full-text index held entirely in memory
pub struct MemoryIndex<T> {
    config: IndexConfig,
    extractor: IdentityExtractor<T>,
    scorer: Bm25Scorer,
    inverted: InvertedIndex,
    /// Serializes writers so check-then-insert is atomic
    write_lock: Mutex<()>,
}

#[derive(Debug, Default)]
struct Candidate {
    score: f64,
    seq: u64,
    terms: Vec<String>,
    matches: BTreeMap<String, Vec<String>>,
    query_terms: HashSet<String>,
}

impl<T> MemoryIndex<T>
where
    T: Send + Sync + 'static,
{
    /// Create an empty index
    pub fn new(config: IndexConfig, extractor: IdentityExtractor<T>) -> Self {
        let scorer = Bm25Scorer::new(config.k1, config.b);
        MemoryIndex {
            config,
            extractor,
            scorer,
            inverted: InvertedIndex::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Index configuration
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// All indexed identities in insertion order
    pub fn ids(&self) -> Vec<DocumentId> {
        self.inverted.ids()
    }

    /// Mutation watermark of the underlying inverted index
    pub fn version(&self) -> u64 {
        self.inverted.version()
    }

    fn document_tokens(&self, doc: &T) -> Vec<String> {
        let mut tokens = Vec::new();
        for field in &self.config.fields {
            if let Some(value) = self.extractor.extract_field(doc, field) {
                collect_text(&value, &mut |text: &str| {
                    tokens.extend(tokenize(text, self.config.min_token_len))
                });
            }
        }
        tokens
    }

    fn insert_unchecked(&self, id: &DocumentId, doc: &T) {
        let tokens = self.document_tokens(doc);
        self.inverted.index_document(id, &tokens);
    }

    fn run_query(
        &self,
        query_terms: &[String],
        prefix: bool,
        combine: CombineWith,
    ) -> Vec<SearchResult> {
        if query_terms.is_empty() {
            return vec![];
        }

        let ctx = ScorerContext::new(self.inverted.total_docs(), self.inverted.avg_doc_len());
        let mut candidates: HashMap<DocumentId, Candidate> = HashMap::new();

        for query_term in query_terms {
            let expansions = if prefix {
                self.inverted.terms_with_prefix(query_term)
            } else {
                vec![query_term.clone()]
            };

            for term in expansions {
                let Some(postings) = self.inverted.lookup(&term) else {
                    continue;
                };
                let df = postings.len();
                // Prefix expansions count for less the longer they run past the query term
                let weight =
                    query_term.chars().count() as f64 / term.chars().count().max(1) as f64;

                for entry in postings.entries {
                    let term_score = self.scorer.term_score(entry.tf, entry.doc_len, df, &ctx);
                    let candidate = candidates.entry(entry.id).or_default();
                    candidate.seq = entry.seq;
                    candidate.score += term_score * weight;
                    if !candidate.terms.contains(&term) {
                        candidate.terms.push(term.clone());
                    }
                    let reached = candidate.matches.entry(term.clone()).or_default();
                    if !reached.contains(query_term) {
                        reached.push(query_term.clone());
                    }
                    candidate.query_terms.insert(query_term.clone());
                }
            }
        }

        let required = query_terms.len();
        let mut results: Vec<(u64, SearchResult)> = candidates
            .into_iter()
            .filter(|(_, c)| combine == CombineWith::Or || c.query_terms.len() == required)
            .map(|(id, c)| {
                (
                    c.seq,
                    SearchResult {
                        id,
                        score: c.score,
                        terms: c.terms,
                        matches: c.matches,
                    },
                )
            })
            .collect();

        results.sort_by(|(seq_a, a), (seq_b, b)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(seq_a.cmp(seq_b))
        });
        results.into_iter().map(|(_, hit)| hit).collect()
    }
}

/// Feed every string found in a field value to `sink`
fn collect_text(value: &FieldValue, sink: &mut dyn FnMut(&str)) {
    match value {
        FieldValue::String(s) => sink(s.as_str()),
        FieldValue::Number(n) => sink(&n.to_string()),
        FieldValue::Bool(b) => sink(if *b { "true" } else { "false" }),
        FieldValue::Array(items) => {
            for item in items {
                collect_text(item, sink);
            }
        }
        FieldValue::Null | FieldValue::Object(_) => {}
    }
}

#[async_trait]
impl<T> SearchIndex<T> for MemoryIndex<T>
where
    T: Send + Sync + 'static,
{
    fn extractor(&self) -> &IdentityExtractor<T> {
        &self.extractor
    }

    fn add(&self, doc: &T) -> IndexResult<()> {
        let id = self.extractor.extract(doc);
        let _guard = self.write_lock.lock();
        if self.inverted.contains(&id) {
            return Err(IndexError::DuplicateId(id));
        }
        self.insert_unchecked(&id, doc);
        Ok(())
    }

    fn add_all(&self, docs: &[T]) -> IndexResult<()> {
        let ids: Vec<DocumentId> = docs.iter().map(|d| self.extractor.extract(d)).collect();
        let _guard = self.write_lock.lock();

        let mut seen = HashSet::with_capacity(ids.len());
        for id in &ids {
            if self.inverted.contains(id) || !seen.insert(id) {
                return Err(IndexError::DuplicateId(id.clone()));
            }
        }

        for (id, doc) in ids.iter().zip(docs) {
            self.insert_unchecked(id, doc);
        }
        Ok(())
    }

    async fn add_all_chunked(&self, docs: Vec<T>, chunk_size: usize) -> IndexResult<()> {
        let chunk_size = chunk_size.max(1);
        let total = docs.len();
        for (n, chunk) in docs.chunks(chunk_size).enumerate() {
            for doc in chunk {
                if let Err(e) = self.add(doc) {
                    warn!(target: "mirrorsearch::index", chunk = n, error = %e, "Chunked add stopped");
                    return Err(e);
                }
            }
            debug!(target: "mirrorsearch::index", chunk = n, total, "Chunk indexed");
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    fn remove(&self, doc: &T) -> IndexResult<()> {
        let id = self.extractor.extract(doc);
        let _guard = self.write_lock.lock();
        if !self.inverted.remove_document(&id) {
            return Err(IndexError::UnknownDocument(id));
        }
        Ok(())
    }

    fn remove_all(&self, docs: Option<&[T]>) -> IndexResult<()> {
        match docs {
            None => {
                let _guard = self.write_lock.lock();
                self.inverted.clear();
                Ok(())
            }
            Some(docs) => {
                let ids: Vec<DocumentId> =
                    docs.iter().map(|d| self.extractor.extract(d)).collect();
                let _guard = self.write_lock.lock();

                if let Some(unknown) = ids.iter().find(|id| !self.inverted.contains(id)) {
                    return Err(IndexError::UnknownDocument(unknown.clone()));
                }

                for id in &ids {
                    self.inverted.remove_document(id);
                }
                Ok(())
            }
        }
    }

    fn search(&self, query: &str, options: &SearchOptions) -> IndexResult<Vec<SearchResult>> {
        let query_terms = tokenize_unique(query, self.config.min_token_len);
        let mut results = self.run_query(&query_terms, options.prefix, options.combine_with);
        if let Some(limit) = options.limit {
            results.truncate(limit);
        }
        Ok(results)
    }

    fn suggest(&self, query: &str, options: &SuggestOptions) -> IndexResult<Vec<Suggestion>> {
        let mut tokens = tokenize(query, self.config.min_token_len);
        let Some(last) = tokens.pop() else {
            return Ok(vec![]);
        };

        let mut suggestions: Vec<Suggestion> = Vec::new();
        for completion in self.inverted.terms_with_prefix(&last) {
            let mut phrase = tokens.clone();
            phrase.push(completion);

            let mut unique = Vec::with_capacity(phrase.len());
            for term in &phrase {
                if !unique.contains(term) {
                    unique.push(term.clone());
                }
            }

            let hits = self.run_query(&unique, false, options.combine_with);
            if hits.is_empty() {
                continue;
            }
            suggestions.push(Suggestion {
                suggestion: phrase.join(" "),
                terms: unique,
                score: hits.iter().map(|h| h.score).sum(),
            });
        }

        suggestions.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.suggestion.cmp(&b.suggestion))
        });
        suggestions.truncate(options.limit.unwrap_or(self.config.suggest_limit));
        Ok(suggestions)
    }

    fn contains(&self, id: &DocumentId) -> bool {
        self.inverted.contains(id)
    }

    fn document_count(&self) -> usize {
        self.inverted.total_docs()
    }
}
