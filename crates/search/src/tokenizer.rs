//! Basic tokenizer for the in-memory index
//!
//! Lowercases, splits on non-alphanumeric characters and drops tokens
//! shorter than a minimum length (counted in characters). No stemming, no
//! stopwords.

use std::collections::HashSet;

/// Tokenize text into searchable terms
///
/// # Example
///
/// ```
/// use mirrorsearch_search::tokenizer::tokenize;
///
/// let tokens = tokenize("Hello, World!", 2);
/// assert_eq!(tokens, vec!["hello", "world"]);
/// ```
pub fn tokenize(text: &str, min_len: usize) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty() && s.chars().count() >= min_len)
        .map(String::from)
        .collect()
}

/// Tokenize and deduplicate for query processing
///
/// First occurrence wins, so order is preserved.
///
/// # Example
///
/// ```
/// use mirrorsearch_search::tokenizer::tokenize_unique;
///
/// let tokens = tokenize_unique("test test TEST", 1);
/// assert_eq!(tokens, vec!["test"]);
/// ```
pub fn tokenize_unique(text: &str, min_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text, min_len)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(tokenize("Hello, World!", 1), vec!["hello", "world"]);
    }

    #[test]
    fn test_tokenize_min_len() {
        assert_eq!(tokenize("I am a test", 2), vec!["am", "test"]);
        assert_eq!(tokenize("I am a test", 1), vec!["i", "am", "a", "test"]);
    }

    #[test]
    fn test_tokenize_counts_chars_not_bytes() {
        assert_eq!(tokenize("é", 2), Vec::<String>::new());
        assert_eq!(tokenize("né", 2), vec!["né"]);
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(tokenize("test123 foo456bar", 1), vec!["test123", "foo456bar"]);
    }

    #[test]
    fn test_tokenize_empty_and_punctuation() {
        assert!(tokenize("", 1).is_empty());
        assert!(tokenize("...---...", 1).is_empty());
    }

    #[test]
    fn test_tokenize_unique_preserves_order() {
        assert_eq!(
            tokenize_unique("apple banana apple cherry", 1),
            vec!["apple", "banana", "cherry"]
        );
    }
}
