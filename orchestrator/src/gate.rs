//! Gate registry and evaluator (distilled spec §4.5; §9 design note "gate
//! registry as data"). Gates are plain data in a `Vec<GateSpec>`; a single
//! evaluator reads the artifact at each gate's path and compares its status
//! field against the pass vocabulary. No per-gate bespoke code.

use truth_kernel::day::DayUtc;
use truth_kernel::paths::TruthRoot;
use std::path::PathBuf;

/// One gate's evaluated readiness state (distilled spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Pass,
    Fail,
    Missing,
    Unknown,
}

impl GateState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Missing => "MISSING",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// A single gate definition. Declares where to find the artifact it reads
/// and what counts as passing; carries no behavior of its own.
#[derive(Debug, Clone)]
pub struct GateSpec {
    pub gate_id: &'static str,
    pub gate_class: i32,
    pub required: bool,
    pub blocking: bool,
    pub kind_root: &'static str,
    pub file_name: &'static str,
    pub status_field: &'static str,
    pub pass_status_values: &'static [&'static str],
}

impl GateSpec {
    #[must_use]
    pub fn artifact_path(&self, truth_root: &TruthRoot, day_utc: &DayUtc) -> PathBuf {
        truth_root.artifact_path(self.kind_root, day_utc.as_str(), self.file_name)
    }
}

/// The gate registry roster (distilled spec §4.5.1), in precedence order —
/// lowest `gate_class` wins. The global kill switch is `class -1`, the
/// highest precedence: present and tripped, it short-circuits the verdict
/// regardless of every other gate.
#[must_use]
pub fn registry() -> Vec<GateSpec> {
    vec![
        GateSpec {
            gate_id: "global_kill_switch",
            gate_class: -1,
            required: false,
            blocking: true,
            kind_root: "reports/global_kill_switch_v1",
            file_name: "kill_switch.json",
            status_field: "status",
            pass_status_values: &["NOT_TRIPPED"],
        },
        GateSpec {
            gate_id: "capital_risk_envelope",
            gate_class: 0,
            required: true,
            blocking: true,
            kind_root: "risk_v1/capital_risk_envelope",
            file_name: "capital_risk_envelope.json",
            status_field: "status",
            pass_status_values: &["PASS"],
        },
        GateSpec {
            gate_id: "drawdown_certificate",
            gate_class: 1,
            required: true,
            blocking: true,
            kind_root: "accounting_v1/drawdown",
            file_name: "drawdown.json",
            status_field: "status",
            pass_status_values: &["PASS", "OK"],
        },
        GateSpec {
            gate_id: "reconciliation",
            gate_class: 2,
            required: true,
            blocking: true,
            kind_root: "reports/reconciliation_report_v3",
            file_name: "reconciliation_report.json",
            status_field: "status",
            pass_status_values: &["OK"],
        },
        GateSpec {
            gate_id: "regime_snapshot",
            gate_class: 3,
            required: true,
            blocking: false,
            kind_root: "monitoring_v1/regime_snapshot",
            file_name: "regime_snapshot.json",
            status_field: "status",
            pass_status_values: &["OK"],
        },
        GateSpec {
            gate_id: "replay_integrity",
            gate_class: 4,
            required: true,
            blocking: true,
            kind_root: "reports/replay_integrity_v2",
            file_name: "replay_integrity.json",
            status_field: "status",
            pass_status_values: &["OK"],
        },
    ]
}

/// Evaluate one gate: load the artifact at its declared path (or record
/// `Missing`), extract `status_field`, compare to `pass_status_values`.
#[must_use]
pub fn evaluate_gate(
    spec: &GateSpec,
    truth_root: &TruthRoot,
    day_utc: &DayUtc,
) -> GateState {
    let path = spec.artifact_path(truth_root, day_utc);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(_) => return GateState::Missing,
    };
    let value: serde_json::Value = match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(_) => return GateState::Unknown,
    };
    match value.get(spec.status_field).and_then(serde_json::Value::as_str) {
        Some(status) if spec.pass_status_values.contains(&status) => GateState::Pass,
        Some(_) => GateState::Fail,
        None => GateState::Unknown,
    }
}
