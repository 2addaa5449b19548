//! Gate-precedence end-to-end: runs the full stage set for a day through
//! `day_golden_generator`, then checks the resulting verdict against the
//! gate registry's precedence rules (distilled in `truth_orchestrator::gate`).

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

fn fixture(name: &str) -> String {
    workspace_root()
        .join("tests/fixtures")
        .join(name)
        .to_string_lossy()
        .to_string()
}

fn binary_path(name: &str) -> PathBuf {
    let mut path = std::env::current_exe()
        .unwrap()
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf();
    path.push(name);
    path
}

fn run_golden_day(fixture_name: &str) -> (Output, tempfile::TempDir) {
    let truth_root = tempfile::tempdir().unwrap();
    let output = Command::new(binary_path("day_golden_generator"))
        .args([&fixture(fixture_name), &truth_root.path().to_string_lossy()])
        .output()
        .expect("spawn day_golden_generator");
    (output, truth_root)
}

#[test]
fn fully_passing_day_yields_pass_verdict() {
    let (output, truth_root) = run_golden_day("day_golden_pass.json");
    let truth_root = truth_root.path();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("verdict_status=PASS"));
    assert!(stdout.contains("exit_code=0"));

    let verdict: serde_json::Value = serde_json::from_slice(
        &std::fs::read(truth_root.join("reports/verdict_v1/2026-07-27/verdict.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(verdict["status"], "PASS");
    assert!(verdict["verdict"]["blocking_class"].is_null());
}

#[test]
fn capital_risk_failure_blocks_at_class_zero_before_other_gates() {
    let (output, truth_root) = run_golden_day("day_golden_fail_capital_risk.json");
    let truth_root = truth_root.path();
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("verdict_status=FAIL"));
    assert!(stdout.contains("verdict_blocking_class=Some(0)"));

    let verdict: serde_json::Value = serde_json::from_slice(
        &std::fs::read(truth_root.join("reports/verdict_v1/2026-07-27/verdict.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(verdict["status"], "FAIL");
    assert_eq!(verdict["verdict"]["blocking_class"], 0);

    // A FAIL verdict must also leave behind a failure artifact for the day.
    let failure_path = truth_root.join("verdict/failures/2026-07-27/failure.json");
    assert!(failure_path.exists());
}
