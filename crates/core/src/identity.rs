//! Identity extraction
//!
//! An [`IdentityExtractor`] maps a document to its [`DocumentId`] using a
//! configurable id field name and a configurable field-extraction function.
//! Both are fixed at construction; callers never re-resolve them per call.
//!
//! The same extraction function is reused by indexes to read text fields,
//! so the engine and its index always agree on what a document contains.

use crate::types::{DocumentId, FieldValue};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Default name of the identity field
pub const DEFAULT_ID_FIELD: &str = "id";

/// Field-extraction function: `(document, field_name) -> value`
pub type ExtractFieldFn<T> = dyn Fn(&T, &str) -> Option<FieldValue> + Send + Sync;

// ============================================================================
// Document
// ============================================================================

/// Documents that can expose named fields
///
/// Only needed for the default extraction strategy. Any `T` works with
/// [`IdentityExtractor::with_extract_field`].
pub trait Document {
    /// Read a field by name
    fn field(&self, name: &str) -> Option<FieldValue>;
}

impl Document for serde_json::Value {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }
}

impl Document for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).map(|s| FieldValue::String(s.clone()))
    }
}

// ============================================================================
// IdentityExtractor
// ============================================================================

/// Pure mapping from a document to its identity
///
/// Cheap to clone; the extraction function is shared.
pub struct IdentityExtractor<T> {
    id_field: Arc<str>,
    extract_field: Arc<ExtractFieldFn<T>>,
}

impl<T> Clone for IdentityExtractor<T> {
    fn clone(&self) -> Self {
        IdentityExtractor {
            id_field: Arc::clone(&self.id_field),
            extract_field: Arc::clone(&self.extract_field),
        }
    }
}

impl<T> fmt::Debug for IdentityExtractor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityExtractor")
            .field("id_field", &self.id_field)
            .finish_non_exhaustive()
    }
}

impl<T: Document + 'static> IdentityExtractor<T> {
    /// Extractor reading fields through [`Document::field`]
    pub fn new(id_field: impl Into<String>) -> Self {
        Self::with_extract_field(id_field, |doc: &T, name: &str| doc.field(name))
    }
}

impl<T: Document + 'static> Default for IdentityExtractor<T> {
    fn default() -> Self {
        Self::new(DEFAULT_ID_FIELD)
    }
}

impl<T> IdentityExtractor<T> {
    /// Extractor with a custom field-extraction function
    pub fn with_extract_field<F>(id_field: impl Into<String>, extract_field: F) -> Self
    where
        F: Fn(&T, &str) -> Option<FieldValue> + Send + Sync + 'static,
    {
        let id_field: String = id_field.into();
        IdentityExtractor {
            id_field: Arc::from(id_field),
            extract_field: Arc::new(extract_field),
        }
    }

    /// Name of the identity field
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Extract the identity of a document
    ///
    /// Never fails: a missing field yields [`DocumentId::Null`].
    pub fn extract(&self, doc: &T) -> DocumentId {
        let value = (self.extract_field)(doc, &self.id_field);
        DocumentId::from_field(value.as_ref())
    }

    /// Read an arbitrary field with the configured strategy
    pub fn extract_field(&self, doc: &T, name: &str) -> Option<FieldValue> {
        (self.extract_field)(doc, name)
    }
}
