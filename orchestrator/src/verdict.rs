//! Verdict evaluation: walk the gate registry in precedence order and emit
//! the day's readiness verdict artifact (distilled spec §4.5, §8 invariant 7).
//!
//! Lowest `gate_class` wins. A gate's absence is pass-equivalent unless the
//! gate is `required`; a gate present but not in its pass vocabulary is
//! always not-passing. Only `blocking` gates can turn a not-passing state
//! into a `FAIL` verdict — `regime_snapshot` is `required` but
//! non-blocking, so its failure is recorded but never blocks.

use crate::gate::{evaluate_gate, registry, GateSpec, GateState};
use truth_kernel::artifact::{ArtifactBuilder, Producer};
use truth_kernel::day::DayUtc;
use truth_kernel::manifest::InputManifestEntry;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_kernel::writer::WriteResult;

/// One gate's contribution to the verdict.
#[derive(Debug, Clone)]
pub struct GateResult {
    pub gate_id: &'static str,
    pub gate_class: i32,
    pub state: GateState,
    pub blocking: bool,
}

/// The day's overall readiness verdict.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub status: &'static str,
    pub blocking_class: Option<i32>,
    pub gate_results: Vec<GateResult>,
    pub reason_codes: Vec<String>,
}

/// Evaluate the full gate registry for `day_utc` (distilled spec §4.5).
///
/// The registry is already in precedence order (lowest `gate_class` first);
/// the first `blocking` gate that is not effectively passing sets the
/// verdict to `FAIL` and names its class, but every gate is still evaluated
/// so the full `gate_results` listing is complete.
#[must_use]
pub fn evaluate(truth_root: &TruthRoot, day_utc: &DayUtc) -> Verdict {
    evaluate_with_registry(&registry(), truth_root, day_utc)
}

fn evaluate_with_registry(
    gates: &[GateSpec],
    truth_root: &TruthRoot,
    day_utc: &DayUtc,
) -> Verdict {
    let mut gate_results = Vec::with_capacity(gates.len());
    let mut blocking_class: Option<i32> = None;
    let mut reason_codes = Vec::new();

    for spec in gates {
        let state = evaluate_gate(spec, truth_root, day_utc);
        let effectively_passing = match state {
            GateState::Pass => true,
            GateState::Missing => !spec.required,
            GateState::Fail | GateState::Unknown => false,
        };

        if !effectively_passing {
            reason_codes.push(format!(
                "GATE_NOT_PASS:{}:{}",
                spec.gate_id,
                state.as_str()
            ));
            if spec.blocking && blocking_class.is_none() {
                blocking_class = Some(spec.gate_class);
            }
        }

        gate_results.push(GateResult {
            gate_id: spec.gate_id,
            gate_class: spec.gate_class,
            state,
            blocking: spec.blocking,
        });
    }

    reason_codes.sort();
    reason_codes.dedup();

    Verdict {
        status: if blocking_class.is_some() { "FAIL" } else { "PASS" },
        blocking_class,
        gate_results,
        reason_codes,
    }
}

/// Write the day's verdict artifact.
///
/// # Errors
///
/// Propagates [`truth_kernel::error::CoreError`] from the kernel
/// envelope/writer/schema layers.
pub fn write_verdict(
    day_utc: &DayUtc,
    truth_root: &TruthRoot,
    producer: &Producer,
    schemas: &SchemaStore,
    schema_path: &str,
    verdict: &Verdict,
    input_manifest: Vec<InputManifestEntry>,
) -> Result<WriteResult, truth_kernel::error::CoreError> {
    let gates_json: Vec<serde_json::Value> = verdict
        .gate_results
        .iter()
        .map(|g| {
            serde_json::json!({
                "gate_id": g.gate_id,
                "gate_class": g.gate_class,
                "state": g.state.as_str(),
                "blocking": g.blocking,
            })
        })
        .collect();

    let field = serde_json::json!({
        "blocking_class": verdict.blocking_class,
        "gates": gates_json,
    });

    let builder = ArtifactBuilder::new("verdict", "v1", day_utc, producer, "canonical_json_hash")
        .status(verdict.status)
        .reason_codes(verdict.reason_codes.clone())
        .with_inputs(input_manifest)
        .field("verdict", field);

    let path = truth_root.artifact_path("reports/verdict_v1", day_utc.as_str(), "verdict.json");
    builder.finalize_and_write(schemas, schema_path, &path)
}
