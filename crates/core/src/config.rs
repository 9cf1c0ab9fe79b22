//! Configuration for engines and the in-memory index
//!
//! Configuration is plain data: every field has a serde default, so a TOML
//! file only needs to name what it changes. The field-extraction function is
//! code, not data, and is supplied separately through
//! [`IdentityExtractor`](crate::identity::IdentityExtractor).

use crate::error::{Error, Result};
use crate::identity::DEFAULT_ID_FIELD;
use serde::{Deserialize, Serialize};

/// Default number of documents per chunk for asynchronous bulk adds
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// Default maximum number of suggestions
pub const DEFAULT_SUGGEST_LIMIT: usize = 10;

// ============================================================================
// EngineConfig
// ============================================================================

/// Synchronization engine settings
///
/// # Example
///
/// ```toml
/// [engine]
/// id_field = "slug"
/// chunk_size = 100
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Name of the identity field
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Chunk size used by `add_all_async_default`
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_id_field() -> String {
    DEFAULT_ID_FIELD.to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl EngineConfig {
    /// Check field values
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty id field or a zero chunk size.
    pub fn validate(&self) -> Result<()> {
        if self.id_field.is_empty() {
            return Err(Error::Config("id_field must not be empty".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// IndexConfig
// ============================================================================

/// In-memory index settings
///
/// `k1` and `b` are the usual BM25 saturation and length-normalization
/// parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Document fields whose text is indexed
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,

    /// Term frequency saturation
    #[serde(default = "default_k1")]
    pub k1: f64,

    /// Length normalization
    #[serde(default = "default_b")]
    pub b: f64,

    /// Tokens shorter than this are dropped
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,

    /// Suggestions returned when a query sets no limit
    #[serde(default = "default_suggest_limit")]
    pub suggest_limit: usize,
}

fn default_fields() -> Vec<String> {
    vec!["text".to_string()]
}

fn default_k1() -> f64 {
    1.2
}

fn default_b() -> f64 {
    0.7
}

fn default_min_token_len() -> usize {
    1
}

fn default_suggest_limit() -> usize {
    DEFAULT_SUGGEST_LIMIT
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            k1: default_k1(),
            b: default_b(),
            min_token_len: default_min_token_len(),
            suggest_limit: default_suggest_limit(),
        }
    }
}

impl IndexConfig {
    /// Index the given fields
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Check field values
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when no field is indexed or BM25
    /// parameters are out of range.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(Error::Config("at least one field must be indexed".to_string()));
        }
        if self.k1.is_nan() || self.k1 < 0.0 {
            return Err(Error::Config(format!("k1 must be non-negative, got {}", self.k1)));
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(Error::Config(format!("b must be within [0, 1], got {}", self.b)));
        }
        Ok(())
    }
}

// ============================================================================
// Config
// ============================================================================

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Engine section
    #[serde(default)]
    pub engine: EngineConfig,

    /// Index section
    #[serde(default)]
    pub index: IndexConfig,
}

impl Config {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on a syntax error or an invalid value.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate both sections
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.index.validate()
    }
}
