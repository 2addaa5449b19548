//! Reconciliation report stage: forward-only readiness check against broker
//! truth, SAFE_IDLE aware (distilled spec §4.4, grounded in
//! `run_reconciliation_report_v3.py`).

use crate::error::StageError;
use truth_kernel::artifact::{ArtifactBuilder, Producer};
use truth_kernel::day::DayUtc;
use truth_kernel::manifest::InputManifestEntry;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_kernel::writer::WriteResult;

/// One reconciliation comparison's closed-vocabulary outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonStatus {
    Ok,
    Fail,
    SkippedSafeIdle,
}

impl ComparisonStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Fail => "FAIL",
            Self::SkippedSafeIdle => "SKIPPED_SAFE_IDLE",
        }
    }
}

/// Broker truth readiness facts the caller has already resolved.
#[derive(Debug, Clone)]
pub struct BrokerTruthFacts {
    pub submissions_present: bool,
    pub broker_event_log_present: bool,
    pub broker_day_manifest_ok: bool,
    pub cash_broker_truth_present: bool,
    pub positions_broker_truth_present: bool,
}

/// The outcome of reconciling one day.
#[derive(Debug, Clone)]
pub struct ReconciliationOutcome {
    pub status: &'static str,
    pub reason_codes: Vec<String>,
    pub exec_vs_broker: ComparisonStatus,
    pub cash: ComparisonStatus,
    pub positions: ComparisonStatus,
}

/// Evaluate the day's reconciliation readiness (distilled spec §4.4).
///
/// `SAFE_IDLE`: when no submissions were made that day, broker truth capture
/// is not required and every comparison is marked `SKIPPED_SAFE_IDLE`, with
/// overall `status = OK`.
#[must_use]
pub fn evaluate(facts: &BrokerTruthFacts) -> ReconciliationOutcome {
    if !facts.submissions_present {
        return ReconciliationOutcome {
            status: "OK",
            reason_codes: vec!["SAFE_IDLE_NO_SUBMISSIONS_OK".to_string()],
            exec_vs_broker: ComparisonStatus::SkippedSafeIdle,
            cash: ComparisonStatus::SkippedSafeIdle,
            positions: ComparisonStatus::SkippedSafeIdle,
        };
    }

    let mut reason_codes = Vec::new();
    let exec_vs_broker = if !facts.broker_event_log_present {
        reason_codes.push("MISSING_BROKER_EVENT_LOG".to_string());
        ComparisonStatus::Fail
    } else if !facts.broker_day_manifest_ok {
        reason_codes.push("MISSING_OK_BROKER_EVENT_DAY_MANIFEST".to_string());
        ComparisonStatus::Fail
    } else {
        ComparisonStatus::Ok
    };

    let cash = if facts.cash_broker_truth_present {
        ComparisonStatus::Ok
    } else {
        reason_codes.push("MISSING_CASH_BROKER_TRUTH_CAPTURE".to_string());
        ComparisonStatus::Fail
    };

    let positions = if facts.positions_broker_truth_present {
        ComparisonStatus::Ok
    } else {
        reason_codes.push("MISSING_POSITIONS_BROKER_TRUTH_CAPTURE".to_string());
        ComparisonStatus::Fail
    };

    reason_codes.sort();
    reason_codes.dedup();
    let all_ok = exec_vs_broker == ComparisonStatus::Ok
        && cash == ComparisonStatus::Ok
        && positions == ComparisonStatus::Ok;

    ReconciliationOutcome {
        status: if all_ok { "OK" } else { "FAIL" },
        reason_codes,
        exec_vs_broker,
        cash,
        positions,
    }
}

/// Write the day's reconciliation report artifact.
///
/// # Errors
///
/// Propagates [`StageError`] from the kernel envelope/writer/schema layers.
pub fn write_reconciliation_report(
    day_utc: &DayUtc,
    truth_root: &TruthRoot,
    producer: &Producer,
    schemas: &SchemaStore,
    schema_path: &str,
    outcome: &ReconciliationOutcome,
    input_manifest: Vec<InputManifestEntry>,
) -> Result<WriteResult, StageError> {
    let field = serde_json::json!({
        "truth_submissions_vs_broker_execdetails": {"status": outcome.exec_vs_broker.as_str()},
        "cash": {"status": outcome.cash.as_str()},
        "positions": {"status": outcome.positions.as_str()},
    });

    let builder = ArtifactBuilder::new(
        "reconciliation_report",
        "v3",
        day_utc,
        producer,
        "canonical_json_hash",
    )
    .status(outcome.status)
    .reason_codes(outcome.reason_codes.clone())
    .with_inputs(input_manifest)
    .field("comparisons", field);

    let path = truth_root.artifact_path(
        "reports/reconciliation_report_v3",
        day_utc.as_str(),
        "reconciliation_report.json",
    );
    builder
        .finalize_and_write(schemas, schema_path, &path)
        .map_err(StageError::from)
}
