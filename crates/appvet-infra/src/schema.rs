//! JSON Schema validation of manifest documents.
//!
//! Wraps the `jsonschema` crate behind the core schema-check port. The
//! schema document is compiled once per run; compiling or loading it is
//! the one failure that aborts a run instead of producing a record.

use std::path::Path;

use jsonschema::error::ValidationErrorKind;
use serde_json::Value;

use appvet_core::schema::{SchemaCheck, SchemaViolation};
use appvet_types::error::SchemaError;
use appvet_types::manifest::AppManifest;

/// A compiled app-standard schema.
#[derive(Debug)]
pub struct SchemaValidator {
    validator: jsonschema::Validator,
}

impl SchemaValidator {
    /// Read, parse, and compile a schema document from disk.
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        if !path.exists() {
            return Err(SchemaError::NotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|err| SchemaError::Read {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;

        let schema: Value = serde_json::from_str(&content).map_err(|err| SchemaError::Parse {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;

        Self::from_value(&schema)
    }

    /// Compile a schema from an in-memory document.
    pub fn from_value(schema: &Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(schema)
            .map_err(|err| SchemaError::Compile {
                reason: err.to_string(),
            })?;

        Ok(Self { validator })
    }
}

impl SchemaCheck for SchemaValidator {
    /// Check one document, reporting the first violation with its
    /// instance path. Never panics; a document of the wrong shape is a
    /// violation like any other.
    fn check(&self, document: &Value) -> Result<(), SchemaViolation> {
        self.validator.validate(document).map_err(|error| {
            let path = error.instance_path.to_string();
            match &error.kind {
                ValidationErrorKind::UnevaluatedProperties { unexpected }
                | ValidationErrorKind::AdditionalProperties { unexpected } => {
                    let field = unexpected
                        .first()
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string());
                    SchemaViolation::new(path, format!("unknown field '{field}'"))
                }
                _ => SchemaViolation::new(path, error.to_string()),
            }
        })
    }
}

/// JSON Schema generated from the typed manifest model.
///
/// Printed by `appvet schema` as a starting point for an on-disk
/// `app-standard.json`; the generated document accepts exactly what the
/// typed decode accepts.
pub fn canonical_schema() -> Value {
    let schema = schemars::schema_for!(AppManifest);
    serde_json::to_value(schema).expect("AppManifest schema serialization should not fail")
}
