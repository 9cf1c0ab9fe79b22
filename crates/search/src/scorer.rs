//! BM25 scoring for the in-memory index
//!
//! This module provides:
//! - ScorerContext for corpus-level statistics
//! - Bm25Scorer, the per-term scoring function
//!
//! For each query term t:
//! score += IDF(t) * (tf * (k1 + 1)) / (tf + k1 * (1 - b + b * dl/avgdl))

// ============================================================================
// ScorerContext
// ============================================================================

/// Corpus-level statistics needed for BM25
///
/// Snapshotted once per query so every term of the query is scored
/// against the same corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScorerContext {
    /// Total documents in corpus
    pub total_docs: usize,

    /// Average document length in tokens
    pub avg_doc_len: f64,
}

impl ScorerContext {
    /// Create a context
    pub fn new(total_docs: usize, avg_doc_len: f64) -> Self {
        ScorerContext {
            total_docs,
            avg_doc_len,
        }
    }

    /// Compute IDF for a term with document frequency `df`
    ///
    /// IDF(t) = ln((N - df + 0.5) / (df + 0.5) + 1)
    pub fn idf(&self, df: usize) -> f64 {
        let n = self.total_docs as f64;
        let df = df as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }
}

// ============================================================================
// Bm25Scorer
// ============================================================================

/// BM25 term scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Scorer {
    /// Term frequency saturation (default 1.2)
    k1: f64,
    /// Length normalization (default 0.7)
    b: f64,
}

impl Default for Bm25Scorer {
    fn default() -> Self {
        Bm25Scorer { k1: 1.2, b: 0.7 }
    }
}

impl Bm25Scorer {
    /// Create a scorer with custom parameters
    pub fn new(k1: f64, b: f64) -> Self {
        Bm25Scorer { k1, b }
    }

    /// Score one term occurrence in one document
    ///
    /// Returns 0.0 when the term does not occur.
    pub fn term_score(&self, tf: u32, doc_len: u32, df: usize, ctx: &ScorerContext) -> f64 {
        if tf == 0 {
            return 0.0;
        }
        let tf = tf as f64;
        let avg_len = ctx.avg_doc_len.max(1.0);
        let tf_component = (tf * (self.k1 + 1.0))
            / (tf + self.k1 * (1.0 - self.b + self.b * doc_len as f64 / avg_len));
        ctx.idf(df) * tf_component
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idf_rare_beats_common() {
        let ctx = ScorerContext::new(100, 10.0);
        assert!(ctx.idf(1) > ctx.idf(50));
        assert!(ctx.idf(0) > ctx.idf(1));
    }

    #[test]
    fn test_idf_positive_when_all_docs_match() {
        let ctx = ScorerContext::new(3, 2.0);
        assert!(ctx.idf(3) > 0.0);
    }

    #[test]
    fn test_term_score_zero_tf() {
        let scorer = Bm25Scorer::default();
        let ctx = ScorerContext::new(10, 5.0);
        assert_eq!(scorer.term_score(0, 5, 1, &ctx), 0.0);
    }

    #[test]
    fn test_term_score_saturates() {
        let scorer = Bm25Scorer::default();
        let ctx = ScorerContext::new(10, 5.0);
        let one = scorer.term_score(1, 5, 2, &ctx);
        let two = scorer.term_score(2, 5, 2, &ctx);
        let ten = scorer.term_score(10, 5, 2, &ctx);
        assert!(two > one);
        // doc_len == avg_doc_len, so `one` is exactly the idf and the
        // component is bounded by k1 + 1
        assert!(ten < one * (1.2 + 1.0));
    }

    #[test]
    fn test_shorter_document_scores_higher() {
        let scorer = Bm25Scorer::default();
        let ctx = ScorerContext::new(10, 5.0);
        assert!(scorer.term_score(1, 2, 2, &ctx) > scorer.term_score(1, 20, 2, &ctx));
    }

    #[test]
    fn test_custom_params() {
        let scorer = Bm25Scorer::new(2.0, 0.5);
        assert!((scorer.k1 - 2.0).abs() < f64::EPSILON);
        assert!((scorer.b - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bm25_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Bm25Scorer>();
    }
}
