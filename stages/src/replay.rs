//! Replay integrity stage: recomputes a deterministic `replay_hash` over the
//! day's truth-relative input set and compares it against a previously
//! recorded expectation (distilled spec §4.4, §8 round-trip law; grounded
//! in `run_replay_integrity_day_v2.py`).
//!
//! `replay_hash` is computed over truth-root-relative paths, not absolute
//! ones, so it is portable across `truth_root` locations — the same day
//! replayed against a different checkout must produce the same hash.

use crate::error::StageError;
use truth_kernel::artifact::{ArtifactBuilder, Producer};
use truth_kernel::day::DayUtc;
use truth_kernel::hash::{canonical_hash, ContentHash};
use truth_kernel::manifest::InputManifestEntry;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_kernel::writer::WriteResult;

/// `present`'s absence is encoded on `InputManifestEntry` as a `_missing`
/// suffix on `type_`; the replay hash's own rows carry it back out as an
/// explicit boolean, per the row shape `{type,path,sha256,present}`.
fn is_present(type_: &str) -> bool {
    !type_.ends_with("_missing")
}

fn bare_type(type_: &str) -> &str {
    type_.strip_suffix("_missing").unwrap_or(type_)
}

/// The exact `{type,path,sha256,present}` rows the replay hash is computed
/// over, sorted by `(type, path)` (distilled spec §4.4). Shared between
/// [`compute_replay_hash`] and the report's recorded `input_hash_set` so the
/// two can never drift apart.
fn replay_rows(inputs: &[InputManifestEntry]) -> Vec<serde_json::Value> {
    let mut rows: Vec<serde_json::Value> = inputs
        .iter()
        .map(|e| {
            serde_json::json!({
                "type": bare_type(&e.type_),
                "path": e.path,
                "sha256": e.sha256.as_str(),
                "present": is_present(&e.type_),
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        let key = |v: &serde_json::Value| {
            (
                v["type"].as_str().unwrap_or("").to_string(),
                v["path"].as_str().unwrap_or("").to_string(),
            )
        };
        key(a).cmp(&key(b))
    });
    rows
}

/// Compute the day's replay hash: `H({day_utc, inputs})` over the sorted,
/// truth-relative input manifest, each row reduced to
/// `{type, path, sha256, present}` (distilled spec §4.4). Plain `H(obj)` —
/// this is a spec-governed, reproducible value an external replay must be
/// able to recompute byte-for-byte, not an internal domain-separated digest.
///
/// # Errors
///
/// Propagates [`truth_kernel::codec::CanonError`] if the manifest cannot be
/// canonicalized.
pub fn compute_replay_hash(
    day_utc: &str,
    inputs: Vec<InputManifestEntry>,
) -> Result<ContentHash, truth_kernel::codec::CanonError> {
    let rows = replay_rows(&inputs);
    let obj = serde_json::json!({ "day_utc": day_utc, "inputs": rows });
    canonical_hash(&obj)
}

/// The outcome of comparing a freshly computed replay hash against the
/// expectation recorded in a previous report (if any).
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub status: &'static str,
    pub reason_codes: Vec<String>,
    pub replay_hash: ContentHash,
    pub expected_replay_hash: Option<String>,
}

/// Compare `replay_hash` against an existing report's recorded expectation,
/// if one exists. A first run (no existing report) always passes and
/// establishes the expectation for future replays.
#[must_use]
pub fn evaluate_against_existing(
    replay_hash: ContentHash,
    existing_replay_hash: Option<&str>,
) -> ReplayOutcome {
    match existing_replay_hash {
        None => ReplayOutcome {
            status: "OK",
            reason_codes: Vec::new(),
            replay_hash,
            expected_replay_hash: None,
        },
        Some(expected) if expected == replay_hash.as_str() => ReplayOutcome {
            status: "OK",
            reason_codes: Vec::new(),
            replay_hash,
            expected_replay_hash: Some(expected.to_string()),
        },
        Some(expected) => ReplayOutcome {
            status: "FAIL",
            reason_codes: vec!["REPLAY_HASH_MISMATCH".to_string()],
            replay_hash,
            expected_replay_hash: Some(expected.to_string()),
        },
    }
}

/// Write the day's replay integrity report.
///
/// # Errors
///
/// Propagates [`StageError`] from the kernel envelope/writer/schema layers.
pub fn write_replay_integrity_report(
    day_utc: &DayUtc,
    truth_root: &TruthRoot,
    producer: &Producer,
    schemas: &SchemaStore,
    schema_path: &str,
    outcome: &ReplayOutcome,
    input_manifest: Vec<InputManifestEntry>,
) -> Result<WriteResult, StageError> {
    let field = serde_json::json!({
        "replay_hash": outcome.replay_hash.as_str(),
        "expected_replay_hash": outcome.expected_replay_hash,
        "observed_replay_hash": outcome.replay_hash.as_str(),
        "input_hash_set": replay_rows(&input_manifest),
    });

    let builder = ArtifactBuilder::new(
        "replay_integrity",
        "v2",
        day_utc,
        producer,
        "canonical_json_hash",
    )
    .status(outcome.status)
    .reason_codes(outcome.reason_codes.clone())
    .with_inputs(input_manifest)
    .field("comparison", field);

    let path = truth_root.artifact_path(
        "reports/replay_integrity_v2",
        day_utc.as_str(),
        "replay_integrity.json",
    );
    builder
        .finalize_and_write(schemas, schema_path, &path)
        .map_err(StageError::from)
}
