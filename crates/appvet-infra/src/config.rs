//! Run configuration loader.
//!
//! Reads `appvet.toml` from the working directory and deserializes it into
//! [`RunConfig`]. Falls back to defaults when the file is missing or
//! malformed; an explicitly named config file gets no such grace.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use appvet_types::policy::PolicyConfig;

/// Settings for one vetting run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunConfig {
    /// Location of the app-standard schema document.
    #[serde(default = "default_schema_path")]
    pub schema_path: String,
    /// Allow-lists consulted by the closure rules.
    #[serde(default)]
    pub policy: PolicyConfig,
}

fn default_schema_path() -> String {
    "./app-standard.json".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            schema_path: default_schema_path(),
            policy: PolicyConfig::default(),
        }
    }
}

/// Load run configuration from `{dir}/appvet.toml`.
///
/// - If the file does not exist, returns [`RunConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and
///   returns the default.
/// - Otherwise returns the parsed configuration.
pub fn load_run_config(dir: &Path) -> RunConfig {
    let config_path = dir.join("appvet.toml");

    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No appvet.toml found at {}, using defaults", config_path.display());
            return RunConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return RunConfig::default();
        }
    };

    match toml::from_str::<RunConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            RunConfig::default()
        }
    }
}

/// Load run configuration from an explicitly named file.
///
/// Unlike [`load_run_config`], a missing or malformed file is an error.
pub fn load_run_config_file(path: &Path) -> anyhow::Result<RunConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_run_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_run_config(tmp.path());
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.schema_path, "./app-standard.json");
    }

    #[test]
    fn load_run_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("appvet.toml"),
            r#"
schema_path = "schemas/app-standard.json"

[policy]
external_services = ["bitcoind", "postgres"]
system_permissions = ["root"]
"#,
        )
        .unwrap();

        let config = load_run_config(tmp.path());
        assert_eq!(config.schema_path, "schemas/app-standard.json");
        assert!(config.policy.allows_external_service("postgres"));
        assert!(!config.policy.allows_external_service("lnd"));
        assert!(!config.policy.allows_system_permission("hw"));
    }

    #[test]
    fn load_run_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("appvet.toml"), "this is not { valid toml !!!").unwrap();

        let config = load_run_config(tmp.path());
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn load_run_config_partial_policy_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("appvet.toml"),
            "[policy]\nexternal_services = [\"postgres\"]\n",
        )
        .unwrap();

        let config = load_run_config(tmp.path());
        assert!(config.policy.allows_external_service("postgres"));
        assert!(!config.policy.allows_external_service("bitcoind"));
        // The untouched list keeps its baseline.
        assert!(config.policy.allows_system_permission("root"));
        assert_eq!(config.schema_path, "./app-standard.json");
    }

    #[test]
    fn load_run_config_file_missing_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_run_config_file(&tmp.path().join("no-such.toml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }

    #[test]
    fn load_run_config_file_malformed_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("appvet.toml");
        std::fs::write(&path, "schema_path = [ 1, 2 ]").unwrap();

        let result = load_run_config_file(&path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse config file")
        );
    }
}
