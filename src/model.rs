// Core structs: products, catalog entries, attributes, candidates, mappings
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Product identifier exactly as it appears in the input document. Any JSON
/// value is accepted and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub serde_json::Value);

impl From<i64> for ProductId {
    fn from(n: i64) -> Self {
        ProductId(n.into())
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId(s.into())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalProduct {
    pub id: ProductId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Any other fields of the catalog record, kept but never scored.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Attributes inferred from a free-text product name. Every field is always
/// present; "unknown" is represented by the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeRecord {
    pub brand: String,
    pub category: String,
    pub size: String,
    pub flavor: String,
    pub product_type: String,
}

/// Which path produced an [`AttributeRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub attributes: AttributeRecord,
    pub source: ExtractionSource,
}

#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub entry: &'a CatalogEntry,
    pub score: f64,
    pub match_reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingResult {
    pub external_id: ProductId,
    pub external_name: String,
    pub internal_id: ProductId,
    pub internal_name: String,
    pub confidence_score: f64,
    pub match_reason: String,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API responded [{status}]: {body}")]
    Status { status: u16, body: String },
    #[error("completion contained no text")]
    EmptyCompletion,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("model request failed: {0}")]
    Model(#[from] LlmError),
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("response JSON is not an object")]
    NotAnObject,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse dataset: {0}")]
    Json(#[from] serde_json::Error),
}
