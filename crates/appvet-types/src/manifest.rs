//! App manifest types.
//!
//! Shapes for decoded `app.yml` documents plus the carriers that move
//! candidates from discovery into vetting. Decoding is lenient on purpose:
//! every collection the vetting rules read is optional, and absent or null
//! collections behave as empty.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::report::RejectionRecord;

// ---------------------------------------------------------------------------
// Manifest shapes
// ---------------------------------------------------------------------------

/// A decoded `app.yml` manifest.
///
/// The manifest carries no identity of its own; the store keys an app by
/// the directory its manifest was found in (see [`CandidateApp`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AppManifest {
    #[serde(default)]
    pub metadata: Option<AppMetadata>,
    #[serde(default)]
    pub containers: Option<Vec<Container>>,
}

impl AppManifest {
    /// Inter-app dependencies in declared order, verbatim (duplicates kept).
    pub fn dependencies(&self) -> &[String] {
        self.metadata
            .as_ref()
            .and_then(|m| m.dependencies.as_deref())
            .unwrap_or_default()
    }

    /// Containers in declared order.
    pub fn containers(&self) -> &[Container] {
        self.containers.as_deref().unwrap_or_default()
    }

    /// Whether `name` appears anywhere in the declared dependency list.
    pub fn declares_dependency(&self, name: &str) -> bool {
        self.dependencies().iter().any(|d| d == name)
    }
}

/// Store-facing metadata from the manifest's `metadata` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AppMetadata {
    /// Display name shown in the store, distinct from the app's identity.
    #[serde(default)]
    pub name: Option<String>,
    /// Release version, checked against semver when present.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub support: Option<String>,
    /// Names of other store apps this app requires, in declared order.
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
}

/// One entry from the manifest's `containers` list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Container {
    /// Container name, unique within its manifest.
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Permissions this container requests, in declared order.
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

impl Container {
    pub fn permissions(&self) -> &[String] {
        self.permissions.as_deref().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Pipeline carriers
// ---------------------------------------------------------------------------

/// An app whose manifest decoded into the typed model, keyed by its store
/// identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateApp {
    /// Store identity: the name of the directory the manifest lives in.
    pub name: String,
    pub manifest: AppManifest,
}

impl CandidateApp {
    pub fn new(name: impl Into<String>, manifest: AppManifest) -> Self {
        Self {
            name: name.into(),
            manifest,
        }
    }

    pub fn dependencies(&self) -> &[String] {
        self.manifest.dependencies()
    }
}

/// A raw manifest document as found on disk, before any schema check.
#[derive(Debug, Clone)]
pub struct LoadedCandidate {
    /// Store identity derived from the containing directory.
    pub name: String,
    /// Path of the `app.yml` file the document was decoded from.
    pub path: PathBuf,
    pub document: serde_json::Value,
}

/// Everything discovery produced: decodable candidates in discovery order,
/// plus the apps already rejected while walking the store root.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryBatch {
    pub candidates: Vec<LoadedCandidate>,
    pub rejections: Vec<RejectionRecord>,
}
