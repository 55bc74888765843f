//! Structural manifest checks.
//!
//! Typed-level rules the JSON Schema cannot express. Failures here are
//! recorded with the same rejection code as schema violations, so a
//! manifest that decodes but breaks one of these rules is rejected the
//! same way a schema-invalid one is.

use anyhow::{Context, bail};
use std::collections::HashSet;

use appvet_types::manifest::AppManifest;

/// Validate a decoded manifest for structural correctness.
///
/// Checks:
/// - container names are non-empty
/// - container names are unique within the manifest
/// - `metadata.version`, when present, parses as valid semver
pub fn validate_manifest(manifest: &AppManifest) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for container in manifest.containers() {
        if container.name.is_empty() {
            bail!("Container name must not be empty");
        }
        if !seen.insert(container.name.as_str()) {
            bail!("Duplicate container name '{}'", container.name);
        }
    }

    if let Some(ref metadata) = manifest.metadata {
        if let Some(ref version_str) = metadata.version {
            version_str
                .parse::<semver::Version>()
                .with_context(|| format!("Invalid semver version '{version_str}'"))?;
        }
    }

    Ok(())
}
