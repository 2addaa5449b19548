//! Shared benchmark fixtures: scratch truth-roots, sample producers/days, and
//! canned position/gate inputs that `benches/*.rs` reuse. Grounded in the
//! `#[cfg(test)]` fixture helpers repeated across `truth-stages` and
//! `truth-orchestrator` (e.g. `orchestrator/src/verdict.rs`'s `write_gate_status`),
//! lifted here so the bench targets don't each hand-roll their own.

use truth_kernel::artifact::Producer;
use truth_kernel::day::DayUtc;
use truth_kernel::decimal::Decimal;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_orchestrator::gate::{registry, GateSpec};
use truth_stages::capital_risk::{Position, PositionsInput};

/// The fixed day key every bench target measures against. Benches don't
/// exercise the future-day rejection path, so a literal UTC-past day is
/// enough and keeps `Criterion` runs independent of wall-clock time.
#[must_use]
pub fn bench_day() -> DayUtc {
    DayUtc::parse_against("2026-07-27", "2026-07-27").expect("bench day is well-formed")
}

#[must_use]
pub fn bench_producer() -> Producer {
    Producer::new("truth-engine", "UNKNOWN", "benchmarks")
}

/// A fresh `SchemaStore`, empty at construction (matches every stage writer's
/// call site — the store fills in lazily from disk on first `validate`).
#[must_use]
pub fn bench_schema_store() -> SchemaStore {
    SchemaStore::new()
}

/// Absolute path to the checked-in schema directory, resolved relative to
/// this crate's manifest so benches run correctly regardless of the
/// invoking shell's working directory.
#[must_use]
pub fn schemas_dir() -> std::path::PathBuf {
    std::path::Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../schemas")).to_path_buf()
}

#[must_use]
pub fn schema_path(file_name: &str) -> String {
    schemas_dir().join(file_name).to_string_lossy().into_owned()
}

/// A scratch truth-root under a fresh temp directory. The `TempDir` guard
/// must outlive the `TruthRoot` returned alongside it or the directory is
/// removed out from under the benchmark.
#[must_use]
pub fn scratch_truth_root() -> (tempfile::TempDir, TruthRoot) {
    let dir = tempfile::tempdir().expect("scratch tempdir");
    let root = TruthRoot::new(dir.path());
    (dir, root)
}

/// `n` synthetic open positions with a uniform `max_loss_cents`, sorted by
/// `position_id` already (matches `capital_risk::evaluate`'s own sort, so the
/// benchmark measures the evaluator's work rather than the sort).
#[must_use]
pub fn sample_positions(n: usize) -> PositionsInput {
    let items = (0..n)
        .map(|i| Position {
            position_id: format!("p{i:05}"),
            status: "OPEN".to_string(),
            max_loss_cents: Some(1_000),
        })
        .collect();
    PositionsInput::Items(items)
}

/// Write every registry gate's artifact at its first pass-status value
/// except `global_kill_switch` (absent is pass-equivalent for it), so a
/// verdict evaluation over this fixture is the best case: every gate hits
/// disk and decodes, none short-circuits on a missing file.
pub fn seed_all_gates_passing(root: &TruthRoot, day_utc: &DayUtc) {
    for spec in registry() {
        if spec.gate_id == "global_kill_switch" {
            continue;
        }
        write_gate_status(root, &spec, day_utc, spec.pass_status_values[0]);
    }
}

pub fn write_gate_status(root: &TruthRoot, spec: &GateSpec, day_utc: &DayUtc, status: &str) {
    let path = spec.artifact_path(root, day_utc);
    std::fs::create_dir_all(path.parent().expect("gate path has a parent")).unwrap();
    std::fs::write(&path, format!(r#"{{"status":"{status}"}}"#)).unwrap();
}

/// A synthetic `n`-engine correlation matrix: identity diagonal, off-diagonal
/// entries walked deterministically through `0.10..=0.55` so larger regimes
/// exercise a realistic mix of below- and above-threshold pairs without
/// depending on a random source (benches must stay reproducible across runs).
#[must_use]
pub fn sample_correlation_matrix(n: usize) -> (Vec<String>, Vec<Vec<Decimal>>) {
    let engine_ids: Vec<String> = (0..n).map(|i| format!("engine-{i:03}")).collect();
    let matrix: Vec<Vec<Decimal>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        Decimal::from_scaled(1_000_000, 6)
                    } else {
                        let walk = ((i + j) % 10) as i128 * 50_000;
                        Decimal::from_scaled(100_000 + walk, 6)
                    }
                })
                .collect()
        })
        .collect();
    (engine_ids, matrix)
}

/// A representative `nav_snapshot`-shaped JSON value, the kind of document
/// the canonical codec and hasher spend the most cycles on in the real
/// pipeline (it recurs once per day per truth-root).
#[must_use]
pub fn sample_nav_artifact_value(day_utc: &DayUtc, producer: &Producer) -> serde_json::Value {
    serde_json::json!({
        "schema_id": "nav_snapshot",
        "schema_version": "v1",
        "day_utc": day_utc.as_str(),
        "produced_utc": day_utc.idempotent_produced_utc(),
        "producer": producer.to_json(),
        "canonical_json_hash": serde_json::Value::Null,
        "status": "OK",
        "reason_codes": serde_json::Value::Array(Vec::new()),
        "input_manifest": serde_json::Value::Array(Vec::new()),
        "envelope": {
            "nav_total": 101_234_567_i64,
            "nav_total_prev": 100_000_000_i64,
            "engine_pnl_to_date": 1_234_567_i64,
            "daily_return": "0.01234567",
            "rolling_peak_nav": 101_500_000_i64,
        }
    })
}
