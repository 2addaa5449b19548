//! Failure artifacts (distilled spec §4.6): a governed, immutable record of
//! a stage failure, written under `<kind>/failures/<day>/failure.json` when
//! partial outputs would be unsafe to leave behind.

use truth_kernel::artifact::{ArtifactBuilder, Producer};
use truth_kernel::day::DayUtc;
use truth_kernel::error::CoreError;
use truth_kernel::manifest::InputManifestEntry;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_kernel::writer::WriteResult;

/// The `failure` object embedded in a failure artifact.
#[derive(Debug, Clone)]
pub struct FailureDetail {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    pub attempted_outputs: Vec<String>,
}

impl FailureDetail {
    #[must_use]
    pub fn from_core_error(err: &CoreError, attempted_outputs: Vec<String>) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            details: serde_json::Value::Null,
            attempted_outputs,
        }
    }
}

/// Write a failure artifact for `kind` at `day_utc` (distilled spec §4.6).
/// `status` is the closed-vocabulary `FAIL_*` value for this failure kind.
///
/// # Errors
///
/// Propagates [`CoreError`] from the kernel envelope/writer/schema layers.
pub fn write_failure_artifact(
    kind: &str,
    day_utc: &DayUtc,
    truth_root: &TruthRoot,
    producer: &Producer,
    schemas: &SchemaStore,
    schema_path: &str,
    status: &str,
    detail: &FailureDetail,
    input_manifest: Vec<InputManifestEntry>,
) -> Result<WriteResult, CoreError> {
    let field = serde_json::json!({
        "code": detail.code,
        "message": detail.message,
        "details": detail.details,
        "attempted_outputs": detail.attempted_outputs,
    });

    let builder = ArtifactBuilder::new(kind, "v1", day_utc, producer, "canonical_json_hash")
        .status(status)
        .reason_codes(vec![detail.code.clone()])
        .with_inputs(input_manifest)
        .field("failure", field);

    let path = truth_root.artifact_path(
        &format!("{kind}/failures"),
        day_utc.as_str(),
        "failure.json",
    );
    builder.finalize_and_write(schemas, schema_path, &path)
}
