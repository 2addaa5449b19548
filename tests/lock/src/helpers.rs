//! Fixture plumbing shared by the `src/bin/*` generators and `tests/*.rs`.
//!
//! Schema paths are resolved from `CARGO_MANIFEST_DIR` rather than the
//! process's current directory, so fixture binaries and `cargo test` behave
//! identically regardless of where they are invoked from.

use std::path::{Path, PathBuf};
use truth_kernel::artifact::Producer;
use truth_kernel::day::DayUtc;
use truth_kernel::decimal::Decimal;
use truth_kernel::schema::SchemaStore;

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// Absolute path to a governed schema file, e.g. `schema_path("nav_snapshot.schema.json")`.
#[must_use]
pub fn schema_path(file_name: &str) -> PathBuf {
    workspace_root().join("schemas").join(file_name)
}

/// Parse a `YYYY-MM-DD` fixture day against a far-future "today" so fixture
/// literals never go stale as the calendar advances.
///
/// # Panics
///
/// Panics if `s` is not `YYYY-MM-DD`-shaped — fixture literals are expected
/// to be well-formed.
#[must_use]
pub fn day(s: &str) -> DayUtc {
    DayUtc::parse_against(s, "2099-12-31").expect("fixture day_utc is well-formed")
}

/// A producer identity for fixture-generated artifacts.
#[must_use]
pub fn producer(module: &str) -> Producer {
    Producer::new("truth-engine", "UNKNOWN", module)
}

/// A fresh, per-process schema cache.
#[must_use]
pub fn schemas() -> SchemaStore {
    SchemaStore::new()
}

/// Read a `Decimal` out of a `[scaled, scale]` JSON pair, e.g. `[100, 2]` for
/// `1.00`. Fixture JSON never carries float literals (they are the one thing
/// the canonical codec forbids), so decimals travel as scaled-integer pairs.
///
/// # Panics
///
/// Panics if `value` is not a two-element `[i64, u32]` array.
#[must_use]
pub fn decimal_pair(value: &serde_json::Value) -> Decimal {
    let arr = value
        .as_array()
        .expect("decimal fixture field must be a [scaled, scale] pair");
    let scaled = arr[0].as_i64().expect("scaled component fits i64");
    let scale = arr[1].as_u64().expect("scale component fits u64");
    Decimal::exact(scaled, scale as u32)
}
