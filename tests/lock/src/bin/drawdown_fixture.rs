//! Fixture binary: reads a drawdown-facts JSON file, writes the day's
//! `drawdown` artifact under a given truth root, and prints `key=value`
//! lines.
//!
//! Usage: `drawdown_fixture <fixture.json> <truth_root_dir>`
//!
//! Fixture JSON shape:
//! ```json
//! {"day_utc": "2026-07-27", "nav_total": 900000, "rolling_peak_nav": 1000000}
//! ```

use truth_stages::drawdown::write_drawdown;
use truth_tests_lock::helpers::{day, producer, schema_path, schemas};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let fixture_path = args.first().expect("usage: drawdown_fixture <fixture.json> <truth_root>");
    let truth_root_dir = args
        .get(1)
        .expect("usage: drawdown_fixture <fixture.json> <truth_root>");

    let raw = std::fs::read(fixture_path).expect("fixture file is readable");
    let fixture: serde_json::Value = serde_json::from_slice(&raw).expect("fixture is valid JSON");

    let day_utc = day(fixture["day_utc"].as_str().expect("day_utc is a string"));
    let truth_root = truth_kernel::paths::TruthRoot::new(truth_root_dir.as_str());
    let producer = producer("truth-stages::drawdown");
    let schemas = schemas();

    let nav_total = fixture["nav_total"].as_i64().expect("nav_total is an integer");
    let rolling_peak_nav = fixture["rolling_peak_nav"]
        .as_i64()
        .expect("rolling_peak_nav is an integer");

    match write_drawdown(
        &day_utc,
        &truth_root,
        &producer,
        &schemas,
        schema_path("drawdown.schema.json").to_str().unwrap(),
        nav_total,
        rolling_peak_nav,
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
