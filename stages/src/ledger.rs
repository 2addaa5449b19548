//! NAV history ledger stage: a day-scoped append of NAV snapshots, derived
//! only from NAV Snapshot Truth artifacts (distilled spec §4.4, grounded in
//! `gen_nav_history_ledger_v1.py`).

use crate::error::StageError;
use truth_kernel::artifact::{ArtifactBuilder, Producer};
use truth_kernel::day::DayUtc;
use truth_kernel::manifest::InputManifestEntry;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_kernel::writer::WriteResult;

/// One row of the ledger: a single day's NAV snapshot facts, already
/// resolved from the upstream `nav_snapshot` artifact.
#[derive(Debug, Clone)]
pub struct LedgerRow {
    pub day_utc: String,
    pub nav_total: i64,
    pub daily_return: String,
    pub rolling_peak_nav: i64,
}

/// Render each row to JSON in the order given — the ledger never reorders
/// rows itself; ordering is the caller's (the upstream NAV history) to own.
#[must_use]
pub fn rows_to_json(rows: &[LedgerRow]) -> Vec<serde_json::Value> {
    rows.iter()
        .map(|r| {
            serde_json::json!({
                "day_utc": r.day_utc,
                "nav_total": r.nav_total,
                "daily_return": r.daily_return,
                "rolling_peak_nav": r.rolling_peak_nav,
            })
        })
        .collect()
}

/// Write the day's NAV history ledger artifact: the full ordered row
/// history up to and including today, derived solely from NAV snapshots.
///
/// # Errors
///
/// Propagates [`StageError`] from the kernel envelope/writer/schema layers.
pub fn write_nav_history_ledger(
    day_utc: &DayUtc,
    truth_root: &TruthRoot,
    producer: &Producer,
    schemas: &SchemaStore,
    schema_path: &str,
    rows: &[LedgerRow],
    input_manifest: Vec<InputManifestEntry>,
) -> Result<WriteResult, StageError> {
    let rows_json = rows_to_json(rows);

    let builder = ArtifactBuilder::new(
        "nav_history_ledger",
        "v1",
        day_utc,
        producer,
        "canonical_json_hash",
    )
    .status("OK")
    .reason_codes(Vec::new())
    .with_inputs(input_manifest)
    .field("rows", serde_json::Value::Array(rows_json));

    let path = truth_root.artifact_path(
        "monitoring_v1/nav_history_ledger",
        day_utc.as_str(),
        "nav_history_ledger.json",
    );
    builder
        .finalize_and_write(schemas, schema_path, &path)
        .map_err(StageError::from)
}
