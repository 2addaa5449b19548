//! Regime snapshot stage (supplemental — present in the original system's
//! stage graph, dropped by the distilled spec's feature list but not
//! excluded by a Non-goal; grounded in `run_regime_snapshot_v3.py`).
//!
//! Classifies the day into `CRASH` / `STRESS` / `HIGH_RISK` / `NORMAL` from
//! drawdown depth and upstream gate health, each classification carrying its
//! own `REGIME_*` reason codes.

use crate::error::StageError;
use truth_kernel::artifact::{ArtifactBuilder, Producer};
use truth_kernel::day::DayUtc;
use truth_kernel::decimal::Decimal;
use truth_kernel::manifest::InputManifestEntry;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_kernel::writer::WriteResult;

/// Upstream facts the regime classifier reads. `capital_envelope_status` and
/// `broker_manifest_status` are the closed-vocabulary `status` fields of the
/// upstream artifacts, already resolved by the caller.
#[derive(Debug, Clone)]
pub struct RegimeFacts {
    pub drawdown_pct: Decimal,
    pub capital_envelope_status: String,
    pub broker_manifest_present: bool,
    pub broker_manifest_status: String,
    pub submissions_present: bool,
}

/// The four closed-vocabulary regime labels, ordered from most to least
/// severe. A day always lands in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Crash,
    Stress,
    HighRisk,
    Normal,
}

impl Regime {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Crash => "CRASH",
            Self::Stress => "STRESS",
            Self::HighRisk => "HIGH_RISK",
            Self::Normal => "NORMAL",
        }
    }
}

/// Classify the day's regime and collect every `REGIME_*` reason code that
/// applied (distilled spec §4.4 supplemental stage; grounded in the
/// original's threshold cascade, most-severe-wins).
#[must_use]
pub fn classify(facts: &RegimeFacts) -> (Regime, Vec<String>) {
    let d = facts.drawdown_pct;
    let crash_drawdown = d <= Decimal::from_scaled(-150_000, 6);
    let severe_envelope_failure = facts.capital_envelope_status == "FAIL"
        && facts.submissions_present;
    let broker_missing_during_submissions =
        facts.submissions_present && (!facts.broker_manifest_present || facts.broker_manifest_status != "OK");

    let mut reason_codes = Vec::new();

    if crash_drawdown || severe_envelope_failure || broker_missing_during_submissions {
        if crash_drawdown {
            reason_codes.push("REGIME_CRASH_DRAWDOWN_LEQ_-0_150000".to_string());
        }
        if severe_envelope_failure {
            reason_codes.push("REGIME_CRASH_SEVERE_ENVELOPE_FAILURE_V2".to_string());
        }
        if broker_missing_during_submissions {
            reason_codes.push("REGIME_CRASH_BROKER_TRUTH_MISSING_DURING_SUBMISSIONS".to_string());
        }
        reason_codes.sort();
        reason_codes.dedup();
        return (Regime::Crash, reason_codes);
    }

    let stress_drawdown = d <= Decimal::from_scaled(-100_000, 6);
    let envelope_not_pass = facts.capital_envelope_status != "PASS";
    if stress_drawdown || envelope_not_pass {
        if stress_drawdown {
            reason_codes.push("REGIME_STRESS_DRAWDOWN_LEQ_-0_100000".to_string());
        }
        if envelope_not_pass {
            reason_codes.push("REGIME_STRESS_CAPITAL_ENVELOPE_V2_NOT_PASS".to_string());
        }
        reason_codes.sort();
        reason_codes.dedup();
        return (Regime::Stress, reason_codes);
    }

    let high_risk_drawdown = d <= Decimal::from_scaled(-50_000, 6);
    let broker_degraded = facts.broker_manifest_present
        && (facts.broker_manifest_status == "DEGRADED" || facts.broker_manifest_status == "FAIL");
    if high_risk_drawdown || broker_degraded {
        if high_risk_drawdown {
            reason_codes.push("REGIME_HIGH_RISK_DRAWDOWN_LEQ_-0_050000".to_string());
        }
        if broker_degraded {
            reason_codes.push("REGIME_HIGH_RISK_BROKER_MANIFEST_NOT_OK".to_string());
        }
        reason_codes.sort();
        reason_codes.dedup();
        return (Regime::HighRisk, reason_codes);
    }

    (Regime::Normal, vec!["REGIME_NORMAL_NO_TRIGGERS".to_string()])
}

/// Write the day's regime snapshot artifact.
///
/// # Errors
///
/// Propagates [`StageError`] from the kernel envelope/writer/schema layers.
pub fn write_regime_snapshot(
    day_utc: &DayUtc,
    truth_root: &TruthRoot,
    producer: &Producer,
    schemas: &SchemaStore,
    schema_path: &str,
    facts: &RegimeFacts,
    input_manifest: Vec<InputManifestEntry>,
) -> Result<WriteResult, StageError> {
    let (regime, reason_codes) = classify(facts);

    let field = serde_json::json!({
        "regime": regime.as_str(),
        "drawdown_pct": facts.drawdown_pct.to_decimal_string(),
        "capital_risk_envelope_v2_status": facts.capital_envelope_status,
        "broker_manifest_status": facts.broker_manifest_status,
    });

    let builder = ArtifactBuilder::new("regime_snapshot", "v3", day_utc, producer, "canonical_json_hash")
        .status("OK")
        .reason_codes(reason_codes)
        .with_inputs(input_manifest)
        .field("envelope", field);

    let path = truth_root.artifact_path(
        "monitoring_v1/regime_snapshot",
        day_utc.as_str(),
        "regime_snapshot.json",
    );
    builder
        .finalize_and_write(schemas, schema_path, &path)
        .map_err(StageError::from)
}
