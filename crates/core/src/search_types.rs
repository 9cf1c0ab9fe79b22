//! Core search types
//!
//! This module defines the types exchanged with a search index:
//! - SearchOptions / SuggestOptions: per-query tuning passed through to the index
//! - SearchResult: a raw, identity-only hit with score and match metadata
//! - Suggestion: a completed query phrase
//!
//! Ordering of results is always index-assigned. Nothing downstream re-sorts.

use crate::types::DocumentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// CombineWith
// ============================================================================

/// How per-term matches are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineWith {
    /// A document matches if any query term matches (default)
    #[default]
    Or,
    /// A document matches only if every query term matches
    And,
}

// ============================================================================
// SearchOptions
// ============================================================================

/// Options for a search query
///
/// # Default Values
///
/// - prefix: false
/// - combine_with: Or
/// - limit: None (no truncation)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Treat every query term as a prefix of index terms
    #[serde(default)]
    pub prefix: bool,

    /// Term combination mode
    #[serde(default)]
    pub combine_with: CombineWith,

    /// Maximum number of hits to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl SearchOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: enable prefix matching
    pub fn with_prefix(mut self, prefix: bool) -> Self {
        self.prefix = prefix;
        self
    }

    /// Builder: set combination mode
    pub fn with_combine(mut self, combine_with: CombineWith) -> Self {
        self.combine_with = combine_with;
        self
    }

    /// Builder: cap the number of hits
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

// ============================================================================
// SuggestOptions
// ============================================================================

/// Options for auto-suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestOptions {
    /// Term combination mode for the underlying searches
    #[serde(default = "default_suggest_combine")]
    pub combine_with: CombineWith,

    /// Maximum number of suggestions (None = index default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

fn default_suggest_combine() -> CombineWith {
    CombineWith::And
}

impl Default for SuggestOptions {
    fn default() -> Self {
        SuggestOptions {
            combine_with: default_suggest_combine(),
            limit: None,
        }
    }
}

impl SuggestOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: cap the number of suggestions
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

// ============================================================================
// SearchResult
// ============================================================================

/// Raw search hit
///
/// Carries only the identity of the matched document. The engine turns it
/// back into a document through its mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identity of the matched document
    pub id: DocumentId,

    /// Relevance score (higher = more relevant)
    pub score: f64,

    /// Index terms that matched, in first-match order
    pub terms: Vec<String>,

    /// Index term -> query terms that reached it
    pub matches: BTreeMap<String, Vec<String>>,
}

impl SearchResult {
    /// Create a hit with no match metadata
    pub fn new(id: DocumentId, score: f64) -> Self {
        SearchResult {
            id,
            score,
            terms: vec![],
            matches: BTreeMap::new(),
        }
    }
}

// ============================================================================
// Suggestion
// ============================================================================

/// Completed query suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Suggested query phrase
    pub suggestion: String,

    /// Terms making up the phrase
    pub terms: Vec<String>,

    /// Aggregate score of the documents the phrase matches
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_options_default() {
        let opts = SearchOptions::default();
        assert!(!opts.prefix);
        assert_eq!(opts.combine_with, CombineWith::Or);
        assert_eq!(opts.limit, None);
    }

    #[test]
    fn test_search_options_builder() {
        let opts = SearchOptions::new()
            .with_prefix(true)
            .with_combine(CombineWith::And)
            .with_limit(5);
        assert!(opts.prefix);
        assert_eq!(opts.combine_with, CombineWith::And);
        assert_eq!(opts.limit, Some(5));
    }

    #[test]
    fn test_suggest_options_default_is_and() {
        let opts = SuggestOptions::default();
        assert_eq!(opts.combine_with, CombineWith::And);
        assert_eq!(opts.with_limit(3).limit, Some(3));
    }

    #[test]
    fn test_search_options_deserialize_partial() {
        let opts: SearchOptions =
            serde_json::from_str(r#"{"combine_with": "and"}"#).unwrap();
        assert_eq!(opts.combine_with, CombineWith::And);
        assert!(!opts.prefix);
    }

    #[test]
    fn test_search_result_new() {
        let hit = SearchResult::new(DocumentId::from(1), 0.5);
        assert_eq!(hit.id, DocumentId::Number(1));
        assert!(hit.terms.is_empty());
        assert!(hit.matches.is_empty());
    }
}
