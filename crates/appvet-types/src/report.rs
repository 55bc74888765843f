//! Rejection taxonomy and the vetting report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Rejection taxonomy
// ---------------------------------------------------------------------------

/// Why an app was rejected.
///
/// Serialized with a `code` tag so report consumers can switch on the
/// machine-readable code while humans read the rendered `detail` line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    /// The `app.yml` could not be decoded at all.
    ManifestDecodeFailure { message: String },

    /// The document decoded but violates the app-standard schema, or a
    /// structural rule the schema cannot express.
    SchemaInvalid { message: String },

    /// Another app with the same name was discovered first.
    DuplicateName { first_seen: String },

    /// The app lists itself as a dependency.
    SelfDependency,

    /// A declared dependency is neither a surviving store app nor an
    /// allow-listed external service.
    UnknownDependency { dependency: String },

    /// A container requests a permission that is neither a system
    /// permission nor backed by one of the app's own dependencies.
    UndeclaredPermission { container: String, permission: String },
}

impl RejectionReason {
    /// The machine-readable code, identical to the serialized `code` tag.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ManifestDecodeFailure { .. } => "MANIFEST_DECODE_FAILURE",
            Self::SchemaInvalid { .. } => "SCHEMA_INVALID",
            Self::DuplicateName { .. } => "DUPLICATE_NAME",
            Self::SelfDependency => "SELF_DEPENDENCY",
            Self::UnknownDependency { .. } => "UNKNOWN_DEPENDENCY",
            Self::UndeclaredPermission { .. } => "UNDECLARED_PERMISSION",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManifestDecodeFailure { message } => {
                write!(f, "manifest failed to decode: {message}")
            }
            Self::SchemaInvalid { message } => {
                write!(f, "manifest failed schema validation: {message}")
            }
            Self::DuplicateName { first_seen } => {
                write!(f, "name already taken by the app discovered at '{first_seen}'")
            }
            Self::SelfDependency => write!(f, "app depends on itself"),
            Self::UnknownDependency { dependency } => {
                write!(f, "unknown dependency '{dependency}'")
            }
            Self::UndeclaredPermission {
                container,
                permission,
            } => {
                write!(
                    f,
                    "container '{container}' requires the '{permission}' permission, \
                     but the app does not list it as a dependency"
                )
            }
        }
    }
}

/// One rejected app with the first violation found for it.
///
/// A run records at most one violation per app; later findings for the same
/// app are dropped, so a dependency declared twice never doubles up here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RejectionRecord {
    pub app: String,
    #[serde(flatten)]
    pub reason: RejectionReason,
    /// Human-readable rendering of `reason`.
    pub detail: String,
}

impl RejectionRecord {
    pub fn new(app: impl Into<String>, reason: RejectionReason) -> Self {
        let detail = reason.to_string();
        Self {
            app: app.into(),
            reason,
            detail,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// The artifact of one vetting run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub generated_at: DateTime<Utc>,
    /// Apps discovered in total: accepted plus rejected.
    pub candidates: usize,
    /// Accepted app names in discovery order.
    pub accepted: Vec<String>,
    /// Rejections in the order the pipeline found them.
    pub rejected: Vec<RejectionRecord>,
}

impl ValidationReport {
    pub fn new(accepted: Vec<String>, rejected: Vec<RejectionRecord>) -> Self {
        Self {
            generated_at: Utc::now(),
            candidates: accepted.len() + rejected.len(),
            accepted,
            rejected,
        }
    }

    /// True when every discovered app was accepted.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}
