//! Fixture binary: evaluates the gate stack over whatever stage artifacts
//! already exist under a truth root for a given day, and prints the verdict
//! as deterministic `key=value` lines — used to check that two independent
//! processes evaluating the same on-disk day agree bit-for-bit.
//!
//! Usage: `gate_fixture <day_utc> <truth_root_dir>`

use truth_kernel::day::DayUtc;
use truth_kernel::paths::TruthRoot;
use truth_orchestrator::verdict::evaluate;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let day_utc_raw = args.first().expect("usage: gate_fixture <day_utc> <truth_root>");
    let truth_root_dir = args.get(1).expect("usage: gate_fixture <day_utc> <truth_root>");

    let day_utc = DayUtc::parse_against(day_utc_raw, "2099-12-31").expect("day_utc is well-formed");
    let truth_root = TruthRoot::new(truth_root_dir.as_str());

    let verdict = evaluate(&truth_root, &day_utc);

    println!("status={}", verdict.status);
    println!("blocking_class={:?}", verdict.blocking_class);
    println!("reason_codes={}", verdict.reason_codes.join(","));
    for gate in &verdict.gate_results {
        println!(
            "gate={} class={} state={} blocking={}",
            gate.gate_id,
            gate.gate_class,
            gate.state.as_str(),
            gate.blocking
        );
    }
}
