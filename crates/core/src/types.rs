//! Core identity types
//!
//! - DocumentId: identity of a logical document across index and mirror
//! - FieldValue: raw value read out of a document field

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw value read from a document field
///
/// Documents are opaque to this crate; extraction strategies hand back
/// JSON values so that both string and numeric identities fit.
pub type FieldValue = serde_json::Value;

// ============================================================================
// DocumentId
// ============================================================================

/// Identity of a document
///
/// Unique among all documents held by one engine. Two documents with the
/// same identity are the same logical entity.
///
/// `Null` is a legal identity: it is what extraction yields for a document
/// without an id field, and it is stored like any other value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    /// Integral numeric identity
    Number(i64),
    /// String identity
    Text(String),
    /// Missing or null identity field
    Null,
}

impl DocumentId {
    /// Convert a field value into an identity
    ///
    /// Strings and integers map directly. Other scalars use their display
    /// form; arrays and objects use their JSON encoding.
    pub fn from_field(value: Option<&FieldValue>) -> Self {
        match value {
            None | Some(FieldValue::Null) => DocumentId::Null,
            Some(FieldValue::String(s)) => DocumentId::Text(s.clone()),
            Some(FieldValue::Number(n)) => match n.as_i64() {
                Some(i) => DocumentId::Number(i),
                None => DocumentId::Text(n.to_string()),
            },
            Some(FieldValue::Bool(b)) => DocumentId::Text(b.to_string()),
            Some(other) => DocumentId::Text(other.to_string()),
        }
    }

    /// Check for the `Null` identity
    pub fn is_null(&self) -> bool {
        matches!(self, DocumentId::Null)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Number(n) => write!(f, "{}", n),
            DocumentId::Text(s) => write!(f, "{}", s),
            DocumentId::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for DocumentId {
    fn from(n: i64) -> Self {
        DocumentId::Number(n)
    }
}

impl From<i32> for DocumentId {
    fn from(n: i32) -> Self {
        DocumentId::Number(n as i64)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        DocumentId::Text(s.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        DocumentId::Text(s)
    }
}

impl From<FieldValue> for DocumentId {
    fn from(value: FieldValue) -> Self {
        DocumentId::from_field(Some(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_field_string_and_number() {
        assert_eq!(
            DocumentId::from_field(Some(&json!("abc"))),
            DocumentId::Text("abc".into())
        );
        assert_eq!(DocumentId::from_field(Some(&json!(42))), DocumentId::Number(42));
    }

    #[test]
    fn test_from_field_missing_is_null() {
        assert_eq!(DocumentId::from_field(None), DocumentId::Null);
        assert_eq!(DocumentId::from_field(Some(&json!(null))), DocumentId::Null);
    }

    #[test]
    fn test_from_field_falsy_values_are_kept() {
        assert_eq!(DocumentId::from_field(Some(&json!(0))), DocumentId::Number(0));
        assert_eq!(
            DocumentId::from_field(Some(&json!(""))),
            DocumentId::Text(String::new())
        );
        assert_eq!(
            DocumentId::from_field(Some(&json!(false))),
            DocumentId::Text("false".into())
        );
    }

    #[test]
    fn test_from_field_float_and_compound() {
        assert_eq!(
            DocumentId::from_field(Some(&json!(1.5))),
            DocumentId::Text("1.5".into())
        );
        assert_eq!(
            DocumentId::from_field(Some(&json!([1, 2]))),
            DocumentId::Text("[1,2]".into())
        );
    }

    #[test]
    fn test_number_and_text_are_distinct() {
        assert_ne!(DocumentId::from(1), DocumentId::from("1"));
    }

    #[test]
    fn test_display() {
        assert_eq!(DocumentId::from(3).to_string(), "3");
        assert_eq!(DocumentId::from("x").to_string(), "x");
        assert_eq!(DocumentId::Null.to_string(), "null");
    }

    #[test]
    fn test_serde_untagged() {
        let id: DocumentId = serde_json::from_str("5").unwrap();
        assert_eq!(id, DocumentId::Number(5));
        let id: DocumentId = serde_json::from_str("\"k\"").unwrap();
        assert_eq!(id, DocumentId::Text("k".into()));
        let id: DocumentId = serde_json::from_str("null").unwrap();
        assert_eq!(id, DocumentId::Null);
    }
}
