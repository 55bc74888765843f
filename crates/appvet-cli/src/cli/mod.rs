//! CLI command definitions and dispatch for the `appvet` binary.
//!
//! Uses clap derive macros for argument parsing. One verb per store
//! operation (e.g., `appvet check ./store`, `appvet graph ./store`).

pub mod check;
pub mod graph;
pub mod inspect;
pub mod schema;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use appvet_infra::config::{RunConfig, load_run_config, load_run_config_file};

/// Vet app-store manifests before they go live.
#[derive(Parser)]
#[command(name = "appvet", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress the styled summary; only the report and errors remain.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Vet every app under a store root and print the JSON report.
    Check {
        /// Store root directory containing app directories.
        dir: PathBuf,

        /// Path of the app-standard schema document.
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Path of an appvet.toml run configuration.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Vet a single app directory, skipping the batch-wide rules.
    Inspect {
        /// App directory containing an app.yml.
        app_dir: PathBuf,

        /// Path of the app-standard schema document.
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Output machine-readable JSON instead of styled text.
        #[arg(long)]
        json: bool,
    },

    /// Render a store's dependency graph in Graphviz DOT format.
    Graph {
        /// Store root directory containing app directories.
        dir: PathBuf,

        /// Path of the app-standard schema document.
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Path of an appvet.toml run configuration.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Include every decodable candidate, not just accepted apps.
        #[arg(long)]
        all: bool,
    },

    /// Print the canonical JSON Schema generated from the manifest model.
    Schema,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Load the run configuration, hard-failing only on an explicit path.
pub(crate) fn resolve_run_config(config: Option<&Path>) -> anyhow::Result<RunConfig> {
    match config {
        Some(path) => load_run_config_file(path),
        None => Ok(load_run_config(Path::new("."))),
    }
}

/// Pick the schema file: the CLI flag wins over the configured path.
pub(crate) fn resolve_schema_path(flag: Option<&Path>, config: &RunConfig) -> PathBuf {
    match flag {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&config.schema_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_flag_overrides_configured_path() {
        let config = RunConfig {
            schema_path: "from-config.json".to_string(),
            ..RunConfig::default()
        };
        let resolved = resolve_schema_path(Some(Path::new("from-flag.json")), &config);
        assert_eq!(resolved, PathBuf::from("from-flag.json"));
        assert_eq!(
            resolve_schema_path(None, &config),
            PathBuf::from("from-config.json")
        );
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("no-such.toml");
        assert!(resolve_run_config(Some(&missing)).is_err());
    }

    #[test]
    fn explicit_config_path_is_parsed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("appvet.toml");
        std::fs::write(&path, "schema_path = \"store/app-standard.json\"\n").unwrap();

        let config = resolve_run_config(Some(&path)).unwrap();
        assert_eq!(config.schema_path, "store/app-standard.json");
    }
}
