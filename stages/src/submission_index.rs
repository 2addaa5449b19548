//! Submission index stage: joins broker-side execution events to Engine-side
//! order intent where a linkage exists (distilled spec §4.4, grounded in
//! `run_submission_index_v1.py`).
//!
//! Distilled spec §9 open question: today the ENGINE/submission linkage is
//! incomplete — a submission frequently cannot be joined back to the intent
//! that produced it. Rather than guessing at a join key, this stage records
//! the gap explicitly via `ENGINE_JOIN_NOT_POSSIBLE_WITHOUT_ENGINE_LINKAGE`
//! and still indexes the submission on its own broker-observable facts.

use crate::error::StageError;
use truth_kernel::artifact::{ArtifactBuilder, Producer};
use truth_kernel::day::DayUtc;
use truth_kernel::decimal::Decimal;
use truth_kernel::manifest::InputManifestEntry;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_kernel::writer::WriteResult;

/// One broker-observed execution event, already resolved by the caller.
/// `filled_qty` is integer units (matches the original fill ledger's `int()`
/// coercion); `avg_fill_px` is a decimal, never a binary float, per the
/// canonical-JSON float ban.
#[derive(Debug, Clone)]
pub struct ExecutionEvent {
    pub submission_id: String,
    pub order_id: Option<String>,
    pub engine_id: Option<String>,
    pub final_state: String,
    pub filled_qty: Option<i64>,
    pub avg_fill_px: Option<Decimal>,
}

/// One indexed row: the execution event plus whether it could be joined
/// back to an ENGINE-originated intent.
#[derive(Debug, Clone)]
pub struct IndexedSubmission {
    pub submission_id: String,
    pub order_id: Option<String>,
    pub engine_id: Option<String>,
    pub final_state: String,
    pub filled_qty: Option<i64>,
    pub avg_fill_px: Option<Decimal>,
    pub engine_linked: bool,
}

/// Build the day's submission index: one row per execution event, in
/// `submission_id` order, each tagged with whether ENGINE linkage was
/// possible.
#[must_use]
pub fn build_index(events: &[ExecutionEvent]) -> (Vec<IndexedSubmission>, Vec<String>) {
    let mut sorted: Vec<&ExecutionEvent> = events.iter().collect();
    sorted.sort_by(|a, b| a.submission_id.cmp(&b.submission_id));

    let mut reason_codes = Vec::new();
    let mut any_unlinked = false;

    let rows = sorted
        .into_iter()
        .map(|e| {
            let engine_linked = e.engine_id.is_some();
            if !engine_linked {
                any_unlinked = true;
            }
            IndexedSubmission {
                submission_id: e.submission_id.clone(),
                order_id: e.order_id.clone(),
                engine_id: e.engine_id.clone(),
                final_state: e.final_state.clone(),
                filled_qty: e.filled_qty,
                avg_fill_px: e.avg_fill_px,
                engine_linked,
            }
        })
        .collect();

    if any_unlinked {
        reason_codes.push("ENGINE_JOIN_NOT_POSSIBLE_WITHOUT_ENGINE_LINKAGE".to_string());
    }

    (rows, reason_codes)
}

/// Write the day's submission index artifact.
///
/// # Errors
///
/// Propagates [`StageError`] from the kernel envelope/writer/schema layers.
pub fn write_submission_index(
    day_utc: &DayUtc,
    truth_root: &TruthRoot,
    producer: &Producer,
    schemas: &SchemaStore,
    schema_path: &str,
    events: &[ExecutionEvent],
    input_manifest: Vec<InputManifestEntry>,
) -> Result<WriteResult, StageError> {
    let (rows, reason_codes) = build_index(events);

    let rows_json: Vec<serde_json::Value> = rows
        .iter()
        .map(|r| {
            serde_json::json!({
                "submission_id": r.submission_id,
                "order_id": r.order_id,
                "engine_id": r.engine_id,
                "final_state": r.final_state,
                "filled_qty": r.filled_qty,
                "avg_fill_px": r.avg_fill_px.map(Decimal::to_decimal_string),
                "engine_linked": r.engine_linked,
            })
        })
        .collect();

    let builder = ArtifactBuilder::new("submission_index", "v1", day_utc, producer, "canonical_json_hash")
        .status("OK")
        .reason_codes(reason_codes)
        .with_inputs(input_manifest)
        .field("rows", serde_json::Value::Array(rows_json));

    let path = truth_root.artifact_path(
        "execution_evidence_v1/submission_index",
        day_utc.as_str(),
        "submission_index.json",
    );
    builder
        .finalize_and_write(schemas, schema_path, &path)
        .map_err(StageError::from)
}
