//! Day-level orchestration (distilled spec §2, §5): the fixed stage order a
//! day's run follows, topological-order enforcement, and the gate-stack
//! run that turns stage outputs into a verdict (and, on failure, a failure
//! artifact).
//!
//! Stage *input* resolution (reading broker feeds, per-engine PnL, position
//! books, etc.) is external-collaborator territory per distilled spec §1 —
//! this module orchestrates stages that have already been given their
//! resolved facts; it does not itself discover them.

use crate::failure::{write_failure_artifact, FailureDetail};
use crate::gate::registry;
use crate::verdict::{evaluate, write_verdict, Verdict};
use truth_kernel::artifact::Producer;
use truth_kernel::day::DayUtc;
use truth_kernel::manifest::InputManifestEntry;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_kernel::writer::WriteResult;

/// The fixed stage execution order for a single day (distilled spec §2:
/// "an orchestrator invokes stage writers in a fixed order"). Gate
/// evaluation and the verdict/pipeline-manifest stages always run last.
pub const STAGE_ORDER: &[&str] = &[
    "nav",
    "ledger",
    "drawdown",
    "capital_risk",
    "correlation",
    "regime",
    "submission_index",
    "reconciliation",
    "replay",
    "pipeline_manifest",
];

/// The position of `stage` in [`STAGE_ORDER`], if it is a recognized stage.
#[must_use]
pub fn stage_index(stage: &str) -> Option<usize> {
    STAGE_ORDER.iter().position(|s| *s == stage)
}

/// Distilled spec §5: "the orchestrator guarantees topological order: a
/// writer never starts before its declared upstream writers have completed
/// successfully." For the fixed linear order this repo ships, that reduces
/// to: the stages completed so far must be exactly a prefix of
/// [`STAGE_ORDER`], and `next_stage` must be the stage immediately after it.
#[must_use]
pub fn may_run_next(completed_in_order: &[&str], next_stage: &str) -> bool {
    if completed_in_order != &STAGE_ORDER[..completed_in_order.len().min(STAGE_ORDER.len())] {
        return false;
    }
    stage_index(next_stage) == Some(completed_in_order.len())
}

/// Run the day's gate stack: evaluate the verdict over whatever stage
/// artifacts already exist under `truth_root`, write the verdict artifact,
/// and — on `FAIL` — also write a failure artifact recording the blocking
/// gate (distilled spec §4.6).
///
/// Returns the process exit code this run should surface (distilled spec
/// §6.3: `0` success, `2` fail-closed).
///
/// # Errors
///
/// Propagates [`truth_kernel::error::CoreError`] if either artifact write fails.
pub fn run_gate_stage(
    day_utc: &DayUtc,
    truth_root: &TruthRoot,
    producer: &Producer,
    schemas: &SchemaStore,
    verdict_schema_path: &str,
    failure_schema_path: &str,
    input_manifest: Vec<InputManifestEntry>,
) -> Result<(Verdict, WriteResult, i32), truth_kernel::error::CoreError> {
    let verdict = evaluate(truth_root, day_utc);
    let write_result = write_verdict(
        day_utc,
        truth_root,
        producer,
        schemas,
        verdict_schema_path,
        &verdict,
        input_manifest.clone(),
    )?;

    let exit_code = if verdict.status == "FAIL" {
        let detail = FailureDetail {
            code: "POLICY_VIOLATION".to_string(),
            message: format!(
                "gate verdict FAIL blocking_class={:?}",
                verdict.blocking_class
            ),
            details: serde_json::json!({ "reason_codes": verdict.reason_codes }),
            attempted_outputs: vec![],
        };
        write_failure_artifact(
            "verdict",
            day_utc,
            truth_root,
            producer,
            schemas,
            failure_schema_path,
            "FAIL_GATE_PRECEDENCE",
            &detail,
            input_manifest,
        )?;
        2
    } else {
        0
    };

    Ok((verdict, write_result, exit_code))
}

/// The gate registry's full set of gate ids, in precedence order — exposed
/// for CLI help text and tests without re-exporting `gate::registry` itself.
#[must_use]
pub fn gate_ids() -> Vec<&'static str> {
    registry().iter().map(|g| g.gate_id).collect()
}
