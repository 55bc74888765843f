//! The vetting pipeline.
//!
//! Drives a discovery batch through the schema check, typed decode,
//! structural checks, and closure validation, and assembles the final
//! report. Pure orchestration; all IO happened during discovery.

use appvet_types::manifest::{AppManifest, CandidateApp, DiscoveryBatch, LoadedCandidate};
use appvet_types::policy::PolicyConfig;
use appvet_types::report::{RejectionReason, RejectionRecord, ValidationReport};

use crate::closure::ClosureValidator;
use crate::manifest::validate_manifest;
use crate::schema::SchemaCheck;

/// Vet one raw candidate through the per-app stages: schema check, typed
/// decode, structural checks.
///
/// Closure rules are not applied here; they need the whole batch. A
/// document can satisfy the schema and still not fit the typed model
/// (the schema file is operator-supplied), so decode failure after a
/// schema pass is a rejection, not a crash.
pub fn vet_candidate(
    loaded: LoadedCandidate,
    schema: &impl SchemaCheck,
) -> Result<CandidateApp, RejectionRecord> {
    if let Err(violation) = schema.check(&loaded.document) {
        tracing::warn!(app = %loaded.name, "Manifest failed schema validation: {violation}");
        return Err(RejectionRecord::new(
            loaded.name,
            RejectionReason::SchemaInvalid {
                message: violation.to_string(),
            },
        ));
    }

    let manifest: AppManifest = match serde_json::from_value(loaded.document) {
        Ok(manifest) => manifest,
        Err(err) => {
            tracing::warn!(app = %loaded.name, "Manifest does not fit the app model: {err}");
            return Err(RejectionRecord::new(
                loaded.name,
                RejectionReason::SchemaInvalid {
                    message: err.to_string(),
                },
            ));
        }
    };

    if let Err(err) = validate_manifest(&manifest) {
        tracing::warn!(app = %loaded.name, "Manifest failed structural checks: {err}");
        return Err(RejectionRecord::new(
            loaded.name,
            RejectionReason::SchemaInvalid {
                message: err.to_string(),
            },
        ));
    }

    Ok(CandidateApp::new(loaded.name, manifest))
}

/// Vet every candidate in `batch` and assemble the run report.
///
/// Rejections accumulate in stage order: discovery failures first, then
/// schema and structural failures, then closure rejections sweep by
/// sweep. Within each stage, records follow discovery order. No candidate
/// can fail the run; every problem ends up in the report.
pub fn vet_batch(
    batch: DiscoveryBatch,
    schema: &impl SchemaCheck,
    policy: &PolicyConfig,
) -> ValidationReport {
    let mut rejections = batch.rejections;
    let mut candidates = Vec::new();

    for loaded in batch.candidates {
        match vet_candidate(loaded, schema) {
            Ok(candidate) => candidates.push(candidate),
            Err(record) => rejections.push(record),
        }
    }

    let outcome = ClosureValidator::new(policy).run(candidates);
    rejections.extend(outcome.rejections);

    let accepted = outcome.accepted.into_iter().map(|app| app.name).collect();
    ValidationReport::new(accepted, rejections)
}
