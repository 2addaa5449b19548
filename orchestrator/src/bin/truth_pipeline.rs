//! CLI entrypoint: `truth_pipeline --day_utc YYYY-MM-DD [--stage <name>]
//! [--truth_root <path>] [--producer_git_sha <sha>]` (distilled spec §6.3).
//!
//! Argument parsing is hand-rolled over `std::env::args()` — no `clap`, the
//! same manual-CLI idiom this workspace's test-fixture binaries already use.
//! Without `--stage`, runs the gate stack over whatever stage artifacts
//! already exist under `--truth_root` for the day and writes the verdict.
//! With `--stage <name>`, only validates that `<name>` is a recognized stage
//! and reports its position in the fixed execution order — stage input
//! resolution (reading broker feeds, per-engine PnL, etc.) is external to
//! this core engine (distilled spec §1).
//!
//! Exit codes: `0` success, `2` fail-closed, `4` immutability violation.

use truth_kernel::day::DayUtc;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_orchestrator::config::RuntimeConfig;
use truth_orchestrator::pipeline::{run_gate_stage, stage_index};

struct Args {
    day_utc: String,
    stage: Option<String>,
    truth_root: String,
    producer_git_sha: Option<String>,
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    let mut day_utc = None;
    let mut stage = None;
    let mut truth_root = None;
    let mut producer_git_sha = None;

    let mut i = 0;
    while i < raw.len() {
        let flag = raw[i].as_str();
        let value = |i: usize| -> Result<String, String> {
            raw.get(i)
                .cloned()
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match flag {
            "--day_utc" => {
                day_utc = Some(value(i + 1)?);
                i += 2;
            }
            "--stage" => {
                stage = Some(value(i + 1)?);
                i += 2;
            }
            "--truth_root" => {
                truth_root = Some(value(i + 1)?);
                i += 2;
            }
            "--producer_git_sha" => {
                producer_git_sha = Some(value(i + 1)?);
                i += 2;
            }
            other => return Err(format!("unrecognized argument: {other}")),
        }
    }

    Ok(Args {
        day_utc: day_utc.ok_or("--day_utc is required")?,
        stage,
        truth_root: truth_root.unwrap_or_else(|| ".".to_string()),
        producer_git_sha,
    })
}

fn main() {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(detail) => {
            eprintln!("FAIL: BAD_DAY_UTC: {detail}");
            std::process::exit(2);
        }
    };

    let day_utc = match DayUtc::parse(&args.day_utc) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("FAIL: {}: {e}", e.code());
            std::process::exit(e.exit_code());
        }
    };

    if let Some(stage) = &args.stage {
        match stage_index(stage) {
            Some(idx) => {
                println!("OK: STAGE_VALIDATE stage={stage} order_index={idx}");
                std::process::exit(0);
            }
            None => {
                eprintln!("FAIL: POLICY_VIOLATION: unrecognized stage={stage}");
                std::process::exit(2);
            }
        }
    }

    let truth_root = TruthRoot::new(args.truth_root);
    let mut config = RuntimeConfig::new(truth_root.clone());
    if let Some(git_sha) = args.producer_git_sha {
        config = config.with_producer_git_sha(git_sha);
    }
    config = config.with_producer_module("truth-orchestrator::pipeline");

    let schemas = SchemaStore::new();

    match run_gate_stage(
        &day_utc,
        &truth_root,
        &config.producer(),
        &schemas,
        "schemas/verdict.schema.json",
        "schemas/failure.schema.json",
        Vec::new(),
    ) {
        Ok((verdict, _write_result, exit_code)) => {
            println!(
                "OK: GATE_STACK status={} blocking_class={:?}",
                verdict.status, verdict.blocking_class
            );
            std::process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("FAIL: {}: {e}", e.code());
            std::process::exit(e.exit_code());
        }
    }
}
