//! Pipeline manifest stage: the day's top-level manifest tying every stage
//! artifact together by path and content hash — the root of the day's DAG
//! (distilled spec §4.4). Grounded in the original's bundle-directory
//! manifest/digest-basis concept (`_INDEX.md`'s `ArtifactBundleV1`), adapted
//! here to reference artifacts that already live under `truth_root` rather
//! than bundling their bytes into a standalone directory.
//!
//! Unlike the other stage artifacts, a pipeline manifest does not assert
//! PASS/FAIL — it is a factual index. Absence or unreadability of a declared
//! artifact is recorded as a `_missing` input-manifest entry (never silently
//! dropped) and turns the manifest's own `status` to `FAIL`.

use crate::error::StageError;
use truth_kernel::artifact::{ArtifactBuilder, Producer};
use truth_kernel::day::DayUtc;
use truth_kernel::hash::ContentHash;
use truth_kernel::manifest::InputManifestEntry;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_kernel::writer::WriteResult;
use std::path::Path;

/// One stage artifact produced for the day, as the caller resolved it.
#[derive(Debug, Clone)]
pub struct ArtifactEntry {
    pub kind: String,
    pub path: String,
    pub sha256: Option<ContentHash>,
}

impl ArtifactEntry {
    /// Resolve an entry by hashing the file at `path` under `kind`. Records
    /// `sha256: None` (never an error) if the file cannot be read — the
    /// manifest surfaces that as a missing input, not a panic.
    #[must_use]
    pub fn resolve(kind: &str, path: &Path) -> Self {
        let sha256 = truth_kernel::manifest::sha256_file(path).ok();
        Self {
            kind: kind.to_string(),
            path: path.display().to_string(),
            sha256,
        }
    }
}

/// Sort entries by `(kind, path)`, the manifest's sole total order.
#[must_use]
pub fn sort_artifact_entries(mut entries: Vec<ArtifactEntry>) -> Vec<ArtifactEntry> {
    entries.sort_by(|a, b| (&a.kind, &a.path).cmp(&(&b.kind, &b.path)));
    entries
}

/// The manifest's overall outcome: `FAIL` if any declared artifact entry
/// could not be hashed.
#[must_use]
pub fn manifest_status(entries: &[ArtifactEntry]) -> &'static str {
    if entries.iter().any(|e| e.sha256.is_none()) {
        "FAIL"
    } else {
        "OK"
    }
}

fn reason_codes_for(entries: &[ArtifactEntry]) -> Vec<String> {
    if entries.iter().any(|e| e.sha256.is_none()) {
        vec!["PIPELINE_MANIFEST_ARTIFACT_MISSING".to_string()]
    } else {
        Vec::new()
    }
}

/// Write the day's pipeline manifest artifact.
///
/// # Errors
///
/// Propagates [`StageError`] from the kernel envelope/writer/schema layers.
pub fn write_pipeline_manifest(
    day_utc: &DayUtc,
    truth_root: &TruthRoot,
    producer: &Producer,
    schemas: &SchemaStore,
    schema_path: &str,
    entries: Vec<ArtifactEntry>,
    input_manifest: Vec<InputManifestEntry>,
) -> Result<WriteResult, StageError> {
    let sorted = sort_artifact_entries(entries);
    let status = manifest_status(&sorted);
    let reason_codes = reason_codes_for(&sorted);

    let artifacts_json: Vec<serde_json::Value> = sorted
        .iter()
        .map(|e| {
            serde_json::json!({
                "kind": e.kind,
                "path": e.path,
                "sha256": e.sha256.as_ref().map(ContentHash::as_str),
            })
        })
        .collect();

    let field = serde_json::json!({ "artifacts": artifacts_json });

    let builder = ArtifactBuilder::new(
        "pipeline_manifest",
        "v1",
        day_utc,
        producer,
        "canonical_json_hash",
    )
    .status(status)
    .reason_codes(reason_codes)
    .with_inputs(input_manifest)
    .field("manifest", field);

    let path = truth_root.artifact_path(
        "reports/pipeline_manifest_v1",
        day_utc.as_str(),
        "pipeline_manifest.json",
    );
    builder
        .finalize_and_write(schemas, schema_path, &path)
        .map_err(StageError::from)
}
