//! `appvet inspect`: vet one app directory on its own.
//!
//! Runs the schema, decode, and structural checks. Closure rules are
//! skipped because they only make sense against a whole store.

use std::path::Path;

use anyhow::Context;
use console::style;

use appvet_core::pipeline::vet_candidate;
use appvet_infra::config::load_run_config;
use appvet_infra::loader::load_app_dir;
use appvet_infra::schema::SchemaValidator;
use appvet_types::manifest::CandidateApp;
use appvet_types::report::RejectionRecord;

use super::resolve_schema_path;

/// Inspect the app at `app_dir`. Returns whether it passed.
pub fn run(app_dir: &Path, schema: Option<&Path>, json: bool) -> anyhow::Result<bool> {
    let run_config = load_run_config(Path::new("."));
    let schema_path = resolve_schema_path(schema, &run_config);

    let validator = SchemaValidator::from_file(&schema_path).with_context(|| {
        format!(
            "Failed to load app-standard schema from {}",
            schema_path.display()
        )
    })?;

    let loaded = load_app_dir(app_dir)?;
    match vet_candidate(loaded, &validator) {
        Ok(candidate) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&candidate)?);
            } else {
                print_candidate(&candidate);
            }
            Ok(true)
        }
        Err(record) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_rejection(&record);
            }
            Ok(false)
        }
    }
}

fn print_candidate(candidate: &CandidateApp) {
    println!();
    println!(
        "  {} {} passes all standalone checks",
        style("*").green().bold(),
        style(&candidate.name).cyan()
    );

    let metadata = candidate.manifest.metadata.as_ref();
    if let Some(version) = metadata.and_then(|m| m.version.as_ref()) {
        println!("    version: {version}");
    }
    if let Some(category) = metadata.and_then(|m| m.category.as_ref()) {
        println!("    category: {category}");
    }

    let deps = candidate.dependencies();
    if deps.is_empty() {
        println!("    dependencies: none");
    } else {
        println!("    dependencies: {}", deps.join(", "));
    }

    for container in candidate.manifest.containers() {
        let permissions = container.permissions();
        if permissions.is_empty() {
            println!("    container: {}", container.name);
        } else {
            println!(
                "    container: {} [{}]",
                container.name,
                permissions.join(", ")
            );
        }
    }
    println!();
}

fn print_rejection(record: &RejectionRecord) {
    println!();
    println!(
        "  {} {} rejected",
        style("!").red(),
        style(&record.app).cyan()
    );
    println!("    {}: {}", record.reason.code(), record.detail);
    println!();
}
