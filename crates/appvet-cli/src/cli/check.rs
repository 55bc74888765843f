//! `appvet check`: run the full vetting pipeline over a store root.

use std::path::Path;

use anyhow::Context;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use appvet_core::pipeline::vet_batch;
use appvet_infra::loader::ManifestLoader;
use appvet_infra::schema::SchemaValidator;
use appvet_types::report::ValidationReport;

use super::{resolve_run_config, resolve_schema_path};

/// Vet every app under `dir` and print the report.
///
/// The JSON report goes to stdout; the styled summary goes to stderr so
/// piped output stays clean. The caller turns the report into an exit
/// code.
pub fn run(
    dir: &Path,
    schema: Option<&Path>,
    config: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<ValidationReport> {
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

    let report = vet_batch(batch, &validator, &run_config.policy);
    tracing::info!(
        candidates = report.candidates,
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        "Vetting run finished"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    if !quiet {
        print_summary(&report);
    }
    Ok(report)
}

fn print_summary(report: &ValidationReport) {
    eprintln!();
    if report.rejected.is_empty() {
        eprintln!(
            "  {} {} of {} apps accepted",
            style("*").green().bold(),
            report.accepted.len(),
            report.candidates
        );
        eprintln!();
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("App").fg(Color::Cyan),
            Cell::new("Code"),
            Cell::new("Detail"),
        ]);

    for record in &report.rejected {
        table.add_row(vec![
            Cell::new(&record.app),
            Cell::new(record.reason.code()).fg(Color::Red),
            Cell::new(&record.detail),
        ]);
    }

    eprintln!("{table}");
    eprintln!(
        "  {} {} accepted, {} rejected",
        style("!").red(),
        report.accepted.len(),
        report.rejected.len()
    );
    eprintln!();
}
