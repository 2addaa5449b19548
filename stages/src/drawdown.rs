//! Drawdown stage: `drawdown_pct` from NAV vs. rolling peak, and the
//! multiplier table consumed by the capital-at-risk gate (distilled spec
//! §4.4, grounded in `run_c2_capital_risk_envelope_gate_v2.py`'s
//! `_multiplier_from_drawdown`).

use crate::error::StageError;
use truth_kernel::artifact::{ArtifactBuilder, Producer};
use truth_kernel::day::DayUtc;
use truth_kernel::decimal::{drawdown_multiplier, Decimal};
use truth_kernel::manifest::InputManifestEntry;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_kernel::writer::WriteResult;

/// `drawdown_pct = (nav_total - rolling_peak_nav) / rolling_peak_nav`, at a
/// fixed scale of 6 decimal places (matches the multiplier table's scale).
///
/// If `rolling_peak_nav == 0`, the drawdown is undefined and the stage must
/// fail closed (there is no peak to measure against yet).
///
/// # Errors
///
/// Returns [`StageError::Div0DailyReturn`]-shaped fail-closed behavior is not
/// applicable here; instead propagates [`StageError::RequiredInputAbsent`]
/// when the peak is zero.
pub fn drawdown_pct(nav_total: i64, rolling_peak_nav: i64) -> Result<Decimal, StageError> {
    if rolling_peak_nav == 0 {
        return Err(StageError::RequiredInputAbsent {
            role: "rolling_peak_nav".to_string(),
        });
    }
    let delta = nav_total - rolling_peak_nav;
    Decimal::div_round_half_up(delta, rolling_peak_nav, 6).ok_or(StageError::RequiredInputAbsent {
        role: "rolling_peak_nav".to_string(),
    })
}

/// Write the day's drawdown artifact: `drawdown_pct` and the resolved
/// `multiplier` (boundary table in [`truth_kernel::decimal::drawdown_multiplier`]).
///
/// # Errors
///
/// Propagates [`StageError`] from the formula or the kernel envelope/writer/
/// schema layers.
pub fn write_drawdown(
    day_utc: &DayUtc,
    truth_root: &TruthRoot,
    producer: &Producer,
    schemas: &SchemaStore,
    schema_path: &str,
    nav_total: i64,
    rolling_peak_nav_value: i64,
    nav_input_manifest: Vec<InputManifestEntry>,
) -> Result<WriteResult, StageError> {
    let pct = drawdown_pct(nav_total, rolling_peak_nav_value)?;
    let multiplier = drawdown_multiplier(pct);

    let envelope = serde_json::json!({
        "nav_total": nav_total,
        "rolling_peak_nav": rolling_peak_nav_value,
        "drawdown_pct": pct.to_decimal_string(),
        "multiplier": multiplier.to_decimal_string(),
    });

    let builder = ArtifactBuilder::new("drawdown", "v1", day_utc, producer, "canonical_json_hash")
        .status("OK")
        .reason_codes(Vec::new())
        .with_inputs(nav_input_manifest)
        .field("envelope", envelope);

    let path = truth_root.artifact_path("accounting_v1/drawdown", day_utc.as_str(), "drawdown.json");
    builder
        .finalize_and_write(schemas, schema_path, &path)
        .map_err(StageError::from)
}
