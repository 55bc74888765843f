//! Filesystem discovery of app manifests.
//!
//! Walks a store root looking for app directories. A directory is an app
//! candidate iff it contains a file literally named `app.yml`; the
//! directory name is the app's store identity. Directories without a
//! manifest are silently skipped, per-app problems become rejection
//! records, and an unreadable directory anywhere in the walk aborts
//! discovery.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use appvet_types::error::DiscoveryError;
use appvet_types::manifest::{DiscoveryBatch, LoadedCandidate};
use appvet_types::report::{RejectionReason, RejectionRecord};

/// Name of the manifest file that marks a directory as an app.
const MANIFEST_FILE: &str = "app.yml";

/// Manifests larger than this are rejected without decoding.
const MAX_MANIFEST_BYTES: u64 = 1024 * 1024;

/// Walks a store root and decodes every `app.yml` it finds.
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    root: PathBuf,
}

impl ManifestLoader {
    /// Create a loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Discover every candidate app under the root.
    ///
    /// Directory entries are visited in lexicographic order, parents
    /// before their children, so discovery order is stable across runs.
    /// Hidden (dot-prefixed) directories are skipped and symlinked
    /// directories are not followed. When two directories claim the
    /// same app name, the first discovered keeps it and later ones are
    /// rejected.
    pub fn discover(&self) -> Result<DiscoveryBatch, DiscoveryError> {
        if !self.root.exists() {
            return Err(DiscoveryError::RootNotFound {
                path: self.root.display().to_string(),
            });
        }
        if !self.root.is_dir() {
            return Err(DiscoveryError::RootNotADirectory {
                path: self.root.display().to_string(),
            });
        }

        let mut batch = DiscoveryBatch::default();
        let mut seen: HashMap<String, String> = HashMap::new();
        self.walk(&self.root, &mut batch, &mut seen)?;

        tracing::debug!(
            root = %self.root.display(),
            candidates = batch.candidates.len(),
            rejected = batch.rejections.len(),
            "Discovery finished"
        );
        Ok(batch)
    }

    fn walk(
        &self,
        dir: &Path,
        batch: &mut DiscoveryBatch,
        seen: &mut HashMap<String, String>,
    ) -> Result<(), DiscoveryError> {
        let read_dir_error = |err: std::io::Error| DiscoveryError::ReadDir {
            path: dir.display().to_string(),
            reason: err.to_string(),
        };

        let mut subdirs = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(read_dir_error)? {
            let entry = entry.map_err(read_dir_error)?;
            // file_type() does not follow symlinks; a symlinked
            // directory is left out of the walk entirely.
            let file_type = entry.file_type().map_err(read_dir_error)?;
            if file_type.is_dir() {
                subdirs.push(entry.path());
            }
        }
        subdirs.sort();

        for subdir in subdirs {
            let Some(name) = subdir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }

            let manifest_path = subdir.join(MANIFEST_FILE);
            if manifest_path.is_file() {
                self.load_candidate(name, &subdir, &manifest_path, batch, seen);
            }
            self.walk(&subdir, batch, seen)?;
        }
        Ok(())
    }

    /// Record one candidate directory, claiming its name.
    ///
    /// The name is claimed even when the manifest fails to decode; a
    /// broken manifest still occupies its directory name.
    fn load_candidate(
        &self,
        name: &str,
        app_dir: &Path,
        manifest_path: &Path,
        batch: &mut DiscoveryBatch,
        seen: &mut HashMap<String, String>,
    ) {
        if let Some(first_seen) = seen.get(name) {
            tracing::warn!(app = %name, first_seen = %first_seen, "Rejecting app: duplicate name");
            batch.rejections.push(RejectionRecord::new(
                name,
                RejectionReason::DuplicateName {
                    first_seen: first_seen.clone(),
                },
            ));
            return;
        }
        seen.insert(name.to_string(), app_dir.display().to_string());

        match read_document(manifest_path) {
            Ok(document) => batch.candidates.push(LoadedCandidate {
                name: name.to_string(),
                path: manifest_path.to_path_buf(),
                document,
            }),
            Err(message) => {
                tracing::warn!(app = %name, "Rejecting app: {message}");
                batch.rejections.push(RejectionRecord::new(
                    name,
                    RejectionReason::ManifestDecodeFailure { message },
                ));
            }
        }
    }
}

/// Load one app directory outside a discovery walk.
///
/// The directory must contain an `app.yml`; its name becomes the app
/// identity exactly as it would in a full discovery. Unlike `discover`,
/// every problem here is a hard error: the caller pointed at this
/// directory explicitly.
pub fn load_app_dir(app_dir: &Path) -> anyhow::Result<LoadedCandidate> {
    let dir = app_dir
        .canonicalize()
        .with_context(|| format!("Failed to resolve app directory {}", app_dir.display()))?;

    let manifest_path = dir.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        bail!("No {MANIFEST_FILE} found in {}", dir.display());
    }

    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            anyhow::anyhow!("App directory name is not valid UTF-8: {}", dir.display())
        })?;

    let document = read_document(&manifest_path).map_err(anyhow::Error::msg)?;
    Ok(LoadedCandidate {
        name,
        path: manifest_path,
        document,
    })
}

/// Read and decode one manifest file to a raw JSON document.
fn read_document(path: &Path) -> Result<serde_json::Value, String> {
    let size = std::fs::metadata(path)
        .map_err(|err| format!("failed to stat manifest: {err}"))?
        .len();
    if size > MAX_MANIFEST_BYTES {
        return Err(format!(
            "manifest is {size} bytes, over the {MAX_MANIFEST_BYTES} byte limit"
        ));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read manifest: {err}"))?;
    serde_yaml_ng::from_str(&content).map_err(|err| format!("invalid YAML: {err}"))
}
