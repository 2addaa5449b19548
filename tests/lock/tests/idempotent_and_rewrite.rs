//! Write-once discipline: rerunning a stage writer with identical facts for
//! a day that already has an artifact must be a no-op (`SkipIdentical`);
//! rerunning it with *different* facts for the same day must refuse to
//! overwrite (`AttemptedRewrite`, process exit code 4).

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

fn run(bin: &str, args: &[&str]) -> Output {
    Command::new(binary_path(bin))
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to spawn {bin}: {e}"))
}

#[test]
fn rerun_with_identical_facts_skips_the_write() {
    let truth_root = tempfile::tempdir().unwrap();
    let truth_root_arg = truth_root.path().to_string_lossy().to_string();
    let fixture_path = fixture("nav_basic.json");

    let first = run("nav_fixture", &[&fixture_path, &truth_root_arg]);
    assert!(first.status.success());
    let first_out = String::from_utf8(first.stdout).unwrap();
    assert!(first_out.contains("action=Wrote"));

    let second = run("nav_fixture", &[&fixture_path, &truth_root_arg]);
    assert!(second.status.success());
    let second_out = String::from_utf8(second.stdout).unwrap();
    assert!(second_out.contains("action=SkipIdentical"));
}

#[test]
fn rerun_with_different_facts_for_the_same_day_is_refused() {
    let truth_root = tempfile::tempdir().unwrap();
    let truth_root_arg = truth_root.path().to_string_lossy().to_string();

    let first = run("drawdown_fixture", &[&fixture("drawdown_basic.json"), &truth_root_arg]);
    assert!(first.status.success());

    // Same day_utc, different nav_total -> different drawdown_pct/multiplier.
    let staging = tempfile::tempdir().unwrap();
    let conflicting_fixture = staging.path().join("conflicting.json");
    std::fs::write(
        &conflicting_fixture,
        r#"{"day_utc": "2026-07-27", "nav_total": 500000, "rolling_peak_nav": 1000000}"#,
    )
    .unwrap();

    let second = run(
        "drawdown_fixture",
        &[&conflicting_fixture.to_string_lossy(), &truth_root_arg],
    );
    assert!(!second.status.success());
    assert_eq!(second.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&second.stderr).contains("ATTEMPTED_REWRITE"));
}
