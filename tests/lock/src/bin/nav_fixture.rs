//! Fixture binary: reads a NAV-facts JSON file, writes the day's `nav_snapshot`
//! artifact under a given truth root, and prints `key=value` lines so a test
//! can assert on the outcome without re-parsing the written JSON itself.
//!
//! Usage: `nav_fixture <fixture.json> <truth_root_dir>`
//!
//! Fixture JSON shape:
//! ```json
//! {
//!   "day_utc": "2026-07-27",
//!   "nav_total": 1010000,
//!   "nav_total_prev": 1000000,
//!   "engine_pnl_to_date": 10000,
//!   "engine_pnl_to_date_prev": 0,
//!   "nav_history_including_today": [1000000, 1010000]
//! }
//! ```

use truth_stages::nav::{write_nav_snapshot, NavAccountingFacts};
use truth_tests_lock::helpers::{day, producer, schema_path, schemas};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let fixture_path = args.first().expect("usage: nav_fixture <fixture.json> <truth_root>");
    let truth_root_dir = args.get(1).expect("usage: nav_fixture <fixture.json> <truth_root>");

    let raw = std::fs::read(fixture_path).expect("fixture file is readable");
    let fixture: serde_json::Value = serde_json::from_slice(&raw).expect("fixture is valid JSON");

    let day_utc = day(fixture["day_utc"].as_str().expect("day_utc is a string"));
    let truth_root = truth_kernel::paths::TruthRoot::new(truth_root_dir.as_str());
    let producer = producer("truth-stages::nav");
    let schemas = schemas();

    let facts = NavAccountingFacts {
        nav_total: fixture["nav_total"].as_i64().expect("nav_total is an integer"),
        nav_total_prev: fixture["nav_total_prev"].as_i64().expect("nav_total_prev is an integer"),
        engine_pnl_to_date: fixture["engine_pnl_to_date"]
            .as_i64()
            .expect("engine_pnl_to_date is an integer"),
        engine_pnl_to_date_prev: fixture["engine_pnl_to_date_prev"]
            .as_i64()
            .expect("engine_pnl_to_date_prev is an integer"),
    };
    let history: Vec<i64> = fixture["nav_history_including_today"]
        .as_array()
        .expect("nav_history_including_today is an array")
        .iter()
        .map(|v| v.as_i64().expect("history entry is an integer"))
        .collect();

    match write_nav_snapshot(
        &day_utc,
        &truth_root,
        &producer,
        &schemas,
        schema_path("nav_snapshot.schema.json").to_str().unwrap(),
        facts,
        &history,
        Vec::new(),
    ) {
        Ok(result) => {
            println!("action={:?}", result.action);
            println!("path={}", result.path);
            println!("sha256={}", result.sha256);
        }
        Err(e) => {
            eprintln!("FAIL: {}", e.code());
            std::process::exit(e.exit_code());
        }
    }
}
