//! Fixture binary: drives every stage writer for a single day, in the
//! workspace's fixed stage order, from one JSON fixture file — producing a
//! complete day's worth of governed artifacts plus the gate-stack verdict
//! under a given truth root. Prints one `artifact=... path=... sha256=...
//! action=...` line per artifact so a test can diff two independently
//! generated truth roots without re-reading every file itself.
//!
//! Usage: `day_golden_generator <fixture.json> <truth_root_dir>`
//!
//! See `tests/fixtures/*.json` for worked examples of the fixture shape.

use truth_kernel::decimal::Decimal;
use truth_kernel::paths::TruthRoot;
use truth_orchestrator::config::RuntimeConfig;
use truth_orchestrator::pipeline::run_gate_stage;
use truth_stages::capital_risk::{self, CapitalRiskEnvelope, Position, PositionsInput};
use truth_stages::correlation::{self, MatrixStatus};
use truth_stages::drawdown::{self, drawdown_pct};
use truth_stages::ledger::{write_nav_history_ledger, LedgerRow};
use truth_stages::nav::{self, NavAccountingFacts};
use truth_stages::pipeline_manifest::{write_pipeline_manifest, ArtifactEntry};
use truth_stages::reconciliation::{self, BrokerTruthFacts};
use truth_stages::regime::{self, RegimeFacts};
use truth_stages::replay;
use truth_stages::submission_index::{self, ExecutionEvent};
use truth_tests_lock::helpers::{day, decimal_pair, schema_path, schemas};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let fixture_path = args
        .first()
        .expect("usage: day_golden_generator <fixture.json> <truth_root>");
    let truth_root_dir = args
        .get(1)
        .expect("usage: day_golden_generator <fixture.json> <truth_root>");

    let raw = std::fs::read(fixture_path).expect("fixture file is readable");
    let f: serde_json::Value = serde_json::from_slice(&raw).expect("fixture is valid JSON");

    let day_utc = day(f["day_utc"].as_str().expect("day_utc is a string"));
    let truth_root = TruthRoot::new(truth_root_dir.as_str());
    let config = RuntimeConfig::new(truth_root.clone())
        .with_producer_git_sha(
            f["producer_git_sha"]
                .as_str()
                .unwrap_or("UNKNOWN")
                .to_string(),
        );
    let schemas = schemas();

    let mut entries: Vec<ArtifactEntry> = Vec::new();
    let mut emit = |kind: &str, path: &str| entries.push(ArtifactEntry::resolve(kind, std::path::Path::new(path)));

    // nav
    let nav_f = &f["nav"];
    let facts = NavAccountingFacts {
        nav_total: nav_f["nav_total"].as_i64().expect("nav_total"),
        nav_total_prev: nav_f["nav_total_prev"].as_i64().expect("nav_total_prev"),
        engine_pnl_to_date: nav_f["engine_pnl_to_date"].as_i64().expect("engine_pnl_to_date"),
        engine_pnl_to_date_prev: nav_f["engine_pnl_to_date_prev"]
            .as_i64()
            .expect("engine_pnl_to_date_prev"),
    };
    let history: Vec<i64> = nav_f["history"]
        .as_array()
        .expect("nav.history is an array")
        .iter()
        .map(|v| v.as_i64().expect("history entry is an integer"))
        .collect();
    let rolling_peak = nav::rolling_peak_nav(&history);

    let nav_result = nav::write_nav_snapshot(
        &day_utc,
        &truth_root,
        &config.producer(),
        &schemas,
        schema_path("nav_snapshot.schema.json").to_str().unwrap(),
        facts,
        &history,
        Vec::new(),
    )
    .expect("nav snapshot writes");
    println!("artifact=nav_snapshot path={} sha256={} action={:?}", nav_result.path, nav_result.sha256, nav_result.action);
    emit("nav_snapshot", &nav_result.path);

    // ledger
    let rows: Vec<LedgerRow> = f["ledger_rows"]
        .as_array()
        .expect("ledger_rows is an array")
        .iter()
        .map(|r| LedgerRow {
            day_utc: r["day_utc"].as_str().expect("row day_utc").to_string(),
            nav_total: r["nav_total"].as_i64().expect("row nav_total"),
            daily_return: r["daily_return"].as_str().expect("row daily_return").to_string(),
            rolling_peak_nav: r["rolling_peak_nav"].as_i64().expect("row rolling_peak_nav"),
        })
        .collect();
    let ledger_result = write_nav_history_ledger(
        &day_utc,
        &truth_root,
        &config.producer(),
        &schemas,
        schema_path("nav_history_ledger.schema.json").to_str().unwrap(),
        &rows,
        Vec::new(),
    )
    .expect("ledger writes");
    println!("artifact=nav_history_ledger path={} sha256={} action={:?}", ledger_result.path, ledger_result.sha256, ledger_result.action);
    emit("nav_history_ledger", &ledger_result.path);

    // drawdown
    let pct = drawdown_pct(facts.nav_total, rolling_peak).expect("drawdown_pct resolves");
    let drawdown_result = drawdown::write_drawdown(
        &day_utc,
        &truth_root,
        &config.producer(),
        &schemas,
        schema_path("drawdown.schema.json").to_str().unwrap(),
        facts.nav_total,
        rolling_peak,
        Vec::new(),
    )
    .expect("drawdown writes");
    println!("artifact=drawdown path={} sha256={} action={:?}", drawdown_result.path, drawdown_result.sha256, drawdown_result.action);
    emit("drawdown", &drawdown_result.path);

    // capital_risk
    let cr_f = &f["capital_risk"];
    let multiplier = Some(decimal_pair(&cr_f["drawdown_multiplier"]));
    let positions: Vec<Position> = cr_f["positions"]
        .as_array()
        .expect("capital_risk.positions is an array")
        .iter()
        .map(|p| Position {
            position_id: p["position_id"].as_str().expect("position_id").to_string(),
            status: p["status"].as_str().expect("status").to_string(),
            max_loss_cents: p["max_loss_cents"].as_i64(),
        })
        .collect();
    let envelope: CapitalRiskEnvelope =
        capital_risk::evaluate(facts.nav_total, multiplier, &PositionsInput::Items(positions));
    let capital_envelope_status = envelope.status().to_string();
    let capital_risk_result = capital_risk::write_capital_risk_envelope(
        &day_utc,
        &truth_root,
        &config.producer(),
        &schemas,
        schema_path("capital_risk_envelope.schema.json").to_str().unwrap(),
        &envelope,
        Vec::new(),
    )
    .expect("capital risk envelope writes");
    println!(
        "artifact=capital_risk_envelope path={} sha256={} action={:?}",
        capital_risk_result.path, capital_risk_result.sha256, capital_risk_result.action
    );
    emit("capital_risk_envelope", &capital_risk_result.path);

    // correlation
    let corr_f = &f["correlation"];
    let threshold = decimal_pair(&corr_f["threshold"]);
    let engine_ids: Vec<String> = corr_f["engine_ids"]
        .as_array()
        .expect("engine_ids is an array")
        .iter()
        .map(|v| v.as_str().expect("engine id is a string").to_string())
        .collect();
    let matrix: Vec<Vec<Decimal>> = corr_f["matrix"]
        .as_array()
        .expect("matrix is an array")
        .iter()
        .map(|row| {
            row.as_array()
                .expect("matrix row is an array")
                .iter()
                .map(decimal_pair)
                .collect()
        })
        .collect();
    let matrix_status = if corr_f["degraded"].as_bool().unwrap_or(false) {
        MatrixStatus::DegradedInsufficientHistory
    } else {
        MatrixStatus::Ok
    };
    let (corr_passes, max_pairwise, flagged, corr_reason_codes) =
        correlation::evaluate_correlation(matrix_status, &engine_ids, &matrix, threshold);
    let correlation_result = correlation::write_correlation_shock(
        &day_utc,
        &truth_root,
        &config.producer(),
        &schemas,
        schema_path("engine_correlation_shock.schema.json").to_str().unwrap(),
        corr_passes,
        max_pairwise,
        threshold,
        &flagged,
        corr_reason_codes,
        Vec::new(),
    )
    .expect("correlation shock writes");
    println!(
        "artifact=engine_correlation_shock path={} sha256={} action={:?}",
        correlation_result.path, correlation_result.sha256, correlation_result.action
    );
    emit("engine_correlation_shock", &correlation_result.path);

    // regime
    let regime_f = &f["regime"];
    let submissions_present = regime_f["submissions_present"].as_bool().expect("submissions_present");
    let regime_facts = RegimeFacts {
        drawdown_pct: pct,
        capital_envelope_status,
        broker_manifest_present: regime_f["broker_manifest_present"].as_bool().expect("broker_manifest_present"),
        broker_manifest_status: regime_f["broker_manifest_status"]
            .as_str()
            .expect("broker_manifest_status")
            .to_string(),
        submissions_present,
    };
    let regime_result = regime::write_regime_snapshot(
        &day_utc,
        &truth_root,
        &config.producer(),
        &schemas,
        schema_path("regime_snapshot.schema.json").to_str().unwrap(),
        &regime_facts,
        Vec::new(),
    )
    .expect("regime snapshot writes");
    println!("artifact=regime_snapshot path={} sha256={} action={:?}", regime_result.path, regime_result.sha256, regime_result.action);
    emit("regime_snapshot", &regime_result.path);

    // submission_index
    let events: Vec<ExecutionEvent> = f["submission_events"]
        .as_array()
        .expect("submission_events is an array")
        .iter()
        .map(|e| ExecutionEvent {
            submission_id: e["submission_id"].as_str().expect("submission_id").to_string(),
            order_id: e["order_id"].as_str().map(str::to_string),
            engine_id: e["engine_id"].as_str().map(str::to_string),
            final_state: e["final_state"].as_str().expect("final_state").to_string(),
            filled_qty: e["filled_qty"].as_i64(),
            avg_fill_px: None,
        })
        .collect();
    let submission_index_result = submission_index::write_submission_index(
        &day_utc,
        &truth_root,
        &config.producer(),
        &schemas,
        schema_path("submission_index.schema.json").to_str().unwrap(),
        &events,
        Vec::new(),
    )
    .expect("submission index writes");
    println!(
        "artifact=submission_index path={} sha256={} action={:?}",
        submission_index_result.path, submission_index_result.sha256, submission_index_result.action
    );
    emit("submission_index", &submission_index_result.path);

    // reconciliation
    let recon_f = &f["reconciliation"];
    let recon_facts = BrokerTruthFacts {
        submissions_present: recon_f["submissions_present"].as_bool().expect("submissions_present"),
        broker_event_log_present: recon_f["broker_event_log_present"].as_bool().expect("broker_event_log_present"),
        broker_day_manifest_ok: recon_f["broker_day_manifest_ok"].as_bool().expect("broker_day_manifest_ok"),
        cash_broker_truth_present: recon_f["cash_broker_truth_present"].as_bool().expect("cash_broker_truth_present"),
        positions_broker_truth_present: recon_f["positions_broker_truth_present"]
            .as_bool()
            .expect("positions_broker_truth_present"),
    };
    let recon_outcome = reconciliation::evaluate(&recon_facts);
    let reconciliation_result = reconciliation::write_reconciliation_report(
        &day_utc,
        &truth_root,
        &config.producer(),
        &schemas,
        schema_path("reconciliation_report.schema.json").to_str().unwrap(),
        &recon_outcome,
        Vec::new(),
    )
    .expect("reconciliation report writes");
    println!(
        "artifact=reconciliation_report path={} sha256={} action={:?}",
        reconciliation_result.path, reconciliation_result.sha256, reconciliation_result.action
    );
    emit("reconciliation_report", &reconciliation_result.path);

    // replay
    let replay_f = &f["replay"];
    let replay_hash = replay::compute_replay_hash(day_utc.as_str(), Vec::new()).expect("replay hash canonicalizes");
    let existing_replay_hash = replay_f["existing_replay_hash"].as_str();
    let replay_outcome = replay::evaluate_against_existing(replay_hash, existing_replay_hash);
    let replay_result = replay::write_replay_integrity_report(
        &day_utc,
        &truth_root,
        &config.producer(),
        &schemas,
        schema_path("replay_integrity.schema.json").to_str().unwrap(),
        &replay_outcome,
        Vec::new(),
    )
    .expect("replay integrity report writes");
    println!(
        "artifact=replay_integrity path={} sha256={} action={:?}",
        replay_result.path, replay_result.sha256, replay_result.action
    );
    emit("replay_integrity", &replay_result.path);

    // pipeline_manifest
    let manifest_result = write_pipeline_manifest(
        &day_utc,
        &truth_root,
        &config.producer(),
        &schemas,
        schema_path("pipeline_manifest.schema.json").to_str().unwrap(),
        entries,
        Vec::new(),
    )
    .expect("pipeline manifest writes");
    println!(
        "artifact=pipeline_manifest path={} sha256={} action={:?}",
        manifest_result.path, manifest_result.sha256, manifest_result.action
    );

    // gate stack verdict
    let (verdict, verdict_result, exit_code) = run_gate_stage(
        &day_utc,
        &truth_root,
        &config.producer(),
        &schemas,
        schema_path("verdict.schema.json").to_str().unwrap(),
        schema_path("failure.schema.json").to_str().unwrap(),
        Vec::new(),
    )
    .expect("gate stage evaluates");
    println!(
        "artifact=verdict path={} sha256={} action={:?}",
        verdict_result.path, verdict_result.sha256, verdict_result.action
    );
    println!("verdict_status={}", verdict.status);
    println!("verdict_blocking_class={:?}", verdict.blocking_class);
    println!("exit_code={exit_code}");
}
