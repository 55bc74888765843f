//! `appvet graph`: render a store's dependency graph as Graphviz DOT.

use std::path::Path;

use anyhow::Context;

use appvet_core::closure::ClosureValidator;
use appvet_core::graph::DependencyGraph;
use appvet_core::pipeline::vet_candidate;
use appvet_infra::loader::ManifestLoader;
use appvet_infra::schema::SchemaValidator;

use super::{resolve_run_config, resolve_schema_path};

/// Print the DOT rendering of the store under `dir` to stdout.
///
/// By default only apps that survive closure validation appear, so the
/// graph matches what `check` would accept. With `all`, every candidate
/// that decodes is drawn, which is the useful view when debugging why
/// something was rejected.
pub fn run(
    dir: &Path,
    schema: Option<&Path>,
    config: Option<&Path>,
    all: bool,
) -> anyhow::Result<()> {
    let run_config = resolve_run_config(config)?;
    let schema_path = resolve_schema_path(schema, &run_config);

    let validator = SchemaValidator::from_file(&schema_path).with_context(|| {
        format!(
            "Failed to load app-standard schema from {}",
            schema_path.display()
        )
    })?;

    let batch = ManifestLoader::new(dir)
        .discover()
        .with_context(|| format!("Failed to scan store root {}", dir.display()))?;

    let mut candidates = Vec::new();
    for loaded in batch.candidates {
        if let Ok(candidate) = vet_candidate(loaded, &validator) {
            candidates.push(candidate);
        }
    }

    let apps = if all {
        candidates
    } else {
        ClosureValidator::new(&run_config.policy)
            .run(candidates)
            .accepted
    };

    let graph = DependencyGraph::build(&apps);
    tracing::debug!(apps = graph.len(), "Rendering dependency graph");
    println!("{}", graph.to_dot());
    Ok(())
}
