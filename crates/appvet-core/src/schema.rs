//! Schema-check port.
//!
//! The pipeline validates raw manifest documents against the app-standard
//! JSON Schema through this trait. The `jsonschema`-backed implementation
//! lives in the infrastructure layer; pipeline tests use stubs.

use thiserror::Error;

/// The first schema violation found in a document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{path}: {message}")]
pub struct SchemaViolation {
    /// JSON Pointer to the failing location, `/` for the document root.
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() { "/".to_string() } else { path },
            message: message.into(),
        }
    }
}

/// Checks a raw manifest document against the app-standard schema.
///
/// Implementations must never panic on malformed input; every problem with
/// a document is reported as a violation.
pub trait SchemaCheck {
    fn check(&self, document: &serde_json::Value) -> Result<(), SchemaViolation>;
}
