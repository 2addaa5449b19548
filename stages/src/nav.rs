//! NAV snapshot stage: `nav_total`, daily return, rolling peak NAV
//! (distilled spec §4.4). Grounded in the `phaseF/accounting` family of the
//! original system and the distilled spec's normative formulas.

use crate::error::StageError;
use truth_kernel::artifact::{ArtifactBuilder, Producer};
use truth_kernel::day::DayUtc;
use truth_kernel::decimal::Decimal;
use truth_kernel::manifest::InputManifestEntry;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_kernel::writer::WriteResult;

/// One day's NAV accounting inputs, already resolved by the caller from the
/// declared `(role, path_template)` list (distilled spec §4.4).
#[derive(Debug, Clone, Copy)]
pub struct NavAccountingFacts {
    pub nav_total: i64,
    pub nav_total_prev: i64,
    pub engine_pnl_to_date: i64,
    pub engine_pnl_to_date_prev: i64,
}

/// `r_t = Δengine_pnl_to_date_t / nav_total_{t-1}`.
///
/// If `nav_total_{t-1} == 0` and `Δpnl == 0`, `r_t := 0`; otherwise fail-closed
/// (distilled spec §4.4, §8 boundary behavior).
///
/// # Errors
///
/// Returns [`StageError::Div0DailyReturn`] when the previous NAV is zero and
/// PnL moved.
pub fn daily_return(facts: NavAccountingFacts, day_utc: &str) -> Result<Decimal, StageError> {
    let delta_pnl = facts.engine_pnl_to_date - facts.engine_pnl_to_date_prev;
    if facts.nav_total_prev == 0 {
        return if delta_pnl == 0 {
            Ok(Decimal::exact(0, 8))
        } else {
            Err(StageError::Div0DailyReturn {
                day_utc: day_utc.to_string(),
            })
        };
    }
    Decimal::div_round_half_up(delta_pnl, facts.nav_total_prev, 8).ok_or_else(|| {
        StageError::Div0DailyReturn {
            day_utc: day_utc.to_string(),
        }
    })
}

/// Rolling peak NAV: prefix max of `nav_total` over the window, inclusive of
/// the current day's value.
#[must_use]
pub fn rolling_peak_nav(history_including_today: &[i64]) -> i64 {
    history_including_today
        .iter()
        .copied()
        .fold(i64::MIN, i64::max)
}

/// Write the day's NAV snapshot artifact.
///
/// # Errors
///
/// Propagates [`StageError`] from the daily-return formula or the kernel
/// envelope/writer/schema layers.
#[allow(clippy::too_many_arguments)]
pub fn write_nav_snapshot(
    day_utc: &DayUtc,
    truth_root: &TruthRoot,
    producer: &Producer,
    schemas: &SchemaStore,
    schema_path: &str,
    facts: NavAccountingFacts,
    nav_history_including_today: &[i64],
    nav_input_manifest: Vec<InputManifestEntry>,
) -> Result<WriteResult, StageError> {
    let r_t = daily_return(facts, day_utc.as_str())?;
    let peak = rolling_peak_nav(nav_history_including_today);

    let envelope = serde_json::json!({
        "nav_total": facts.nav_total,
        "nav_total_prev": facts.nav_total_prev,
        "engine_pnl_to_date": facts.engine_pnl_to_date,
        "daily_return": r_t.to_decimal_string(),
        "rolling_peak_nav": peak,
    });

    let builder = ArtifactBuilder::new("nav_snapshot", "v1", day_utc, producer, "canonical_json_hash")
        .status("OK")
        .reason_codes(Vec::new())
        .with_inputs(nav_input_manifest)
        .field("envelope", envelope);

    let path = truth_root.artifact_path(
        "accounting_v1/nav",
        day_utc.as_str(),
        "nav.json",
    );
    builder
        .finalize_and_write(schemas, schema_path, &path)
        .map_err(StageError::from)
}
