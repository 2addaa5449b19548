//! Cross-process determinism: independent invocations of the fixture
//! binaries against the same inputs must agree bit-for-bit, regardless of
//! which truth root they write into or what working directory they run
//! from. Proves the governed artifacts carry no hidden dependence on
//! process state (cwd, absolute paths, wall-clock jitter beyond the
//! declared `produced_utc` field).

use std::path::{Path, PathBuf};
use std::process::Command;

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_path_buf()
}

fn fixture(name: &str) -> String {
    workspace_root()
        .join("tests/fixtures")
        .join(name)
        .to_string_lossy()
        .to_string()
}

/// `cargo test` places test binaries alongside the workspace's other
/// binaries in the profile's `deps/` directory's parent.
fn binary_path(name: &str) -> PathBuf {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("deps dir exists")
        .parent()
        .expect("profile dir exists")
        .to_path_buf();
    path.push(name);
    path
}

fn run(bin: &str, args: &[&str]) -> String {
    let output = Command::new(binary_path(bin))
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to spawn {bin}: {e}"));
    assert!(
        output.status.success(),
        "{bin} {args:?} exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

fn read_artifact(truth_root: &Path, relative: &str) -> Vec<u8> {
    std::fs::read(truth_root.join(relative)).expect("artifact was written")
}

#[test]
fn nav_fixture_is_byte_identical_across_independent_truth_roots() {
    let fixture_path = fixture("nav_basic.json");

    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let out_a = run(
        "nav_fixture",
        &[&fixture_path, &dir_a.path().to_string_lossy()],
    );
    let out_b = run(
        "nav_fixture",
        &[&fixture_path, &dir_b.path().to_string_lossy()],
    );

    assert_eq!(out_a, out_b, "stdout differs across independent truth roots");

    let bytes_a = read_artifact(dir_a.path(), "accounting_v1/nav/2026-07-27/nav.json");
    let bytes_b = read_artifact(dir_b.path(), "accounting_v1/nav/2026-07-27/nav.json");
    assert_eq!(bytes_a, bytes_b, "nav.json content differs byte-for-byte");
}

#[test]
fn day_golden_generator_produces_identical_artifact_sets_in_parallel_roots() {
    let fixture_path = fixture("day_golden_pass.json");

    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let out_a = run(
        "day_golden_generator",
        &[&fixture_path, &dir_a.path().to_string_lossy()],
    );
    let out_b = run(
        "day_golden_generator",
        &[&fixture_path, &dir_b.path().to_string_lossy()],
    );

    assert_eq!(out_a, out_b, "golden-day stdout differs across truth roots");
    assert!(out_a.contains("verdict_status=PASS"));

    for relative in [
        "accounting_v1/nav/2026-07-27/nav.json",
        "accounting_v1/drawdown/2026-07-27/drawdown.json",
        "risk_v1/capital_risk_envelope/2026-07-27/capital_risk_envelope.json",
        "reports/verdict_v1/2026-07-27/verdict.json",
    ] {
        let bytes_a = read_artifact(dir_a.path(), relative);
        let bytes_b = read_artifact(dir_b.path(), relative);
        assert_eq!(bytes_a, bytes_b, "{relative} differs byte-for-byte");
    }
}

#[test]
fn replay_hash_is_portable_across_truth_root_locations() {
    let fixture_path = fixture("day_golden_pass.json");

    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    run(
        "day_golden_generator",
        &[&fixture_path, &dir_a.path().to_string_lossy()],
    );
    run(
        "day_golden_generator",
        &[&fixture_path, &dir_b.path().to_string_lossy()],
    );

    let replay_a: serde_json::Value = serde_json::from_slice(&read_artifact(
        dir_a.path(),
        "reports/replay_integrity_v2/2026-07-27/replay_integrity.json",
    ))
    .unwrap();
    let replay_b: serde_json::Value = serde_json::from_slice(&read_artifact(
        dir_b.path(),
        "reports/replay_integrity_v2/2026-07-27/replay_integrity.json",
    ))
    .unwrap();

    // dir_a and dir_b are distinct absolute paths; the replay hash must not
    // leak either of them.
    assert_eq!(
        replay_a["comparison"]["replay_hash"],
        replay_b["comparison"]["replay_hash"]
    );
}
