//! Capital-at-risk envelope stage (distilled spec §4.4, fully grounded in
//! `run_c2_capital_risk_envelope_gate_v2.py`). This module computes the
//! envelope; the class-2 gate in `truth-orchestrator` consumes its
//! `status`/`reason_codes` under the gate precedence rules (distilled spec
//! §4.5).

use crate::error::StageError;
use truth_kernel::artifact::{ArtifactBuilder, Producer};
use truth_kernel::day::DayUtc;
use truth_kernel::decimal::Decimal;
use truth_kernel::manifest::InputManifestEntry;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_kernel::writer::WriteResult;

/// `BASE_ENVELOPE_PCT` from the original gate: 2% of NAV before the
/// drawdown multiplier is applied.
pub const BASE_ENVELOPE_PCT_SCALED_4: i64 = 200; // 0.02 at scale 4

/// One open position's risk contribution, as resolved from the positions
/// input by the caller.
#[derive(Debug, Clone)]
pub struct Position {
    pub position_id: String,
    pub status: String,
    pub max_loss_cents: Option<i64>,
}

/// The positions input, as the caller resolved it from the declared
/// `positions` role. `Invalid` covers both "file present but not a parseable
/// items array" and a positions source that could not be read at all —
/// the original gate does not distinguish the two at the envelope level.
#[derive(Debug, Clone)]
pub enum PositionsInput {
    Items(Vec<Position>),
    Invalid,
}

/// The computed envelope for one day. `drawdown_multiplier`/`allowed_cents`
/// are `None` only when the upstream drawdown input was unavailable —
/// `B2_DRAWDOWN_MISSING_FAILCLOSED` is then the sole reason code and no
/// envelope can be computed at all.
#[derive(Debug, Clone)]
pub struct CapitalRiskEnvelope {
    pub nav_total_cents: i64,
    pub drawdown_multiplier: Option<Decimal>,
    pub allowed_cents: Option<i64>,
    pub risk_sum_cents: Option<i64>,
    pub headroom_cents: Option<i64>,
    pub reason_codes: Vec<String>,
    pub breakdown: Vec<PositionBreakdown>,
}

/// Per-position row in the envelope's breakdown.
#[derive(Debug, Clone)]
pub struct PositionBreakdown {
    pub position_id: String,
    pub status: String,
    pub max_loss_cents: Option<i64>,
    pub included_in_risk_sum: bool,
}

impl CapitalRiskEnvelope {
    #[must_use]
    pub fn status(&self) -> &'static str {
        if self.reason_codes.is_empty() {
            "PASS"
        } else {
            "FAIL"
        }
    }
}

/// Evaluate the capital-at-risk envelope for one day (distilled spec §4.4).
///
/// `drawdown_multiplier` is `None` when the upstream drawdown certificate
/// input could not be resolved at all; `positions` is `PositionsInput::Invalid`
/// when the declared `positions` role could not be read as a parseable items
/// array. Either failure fails the whole envelope closed
/// (`B2_DRAWDOWN_MISSING_FAILCLOSED` / `B2_POSITIONS_ITEMS_INVALID_OR_MISSING`);
/// both together additionally add `B2_INPUTS_MISSING_FAILCLOSED`, and no
/// `allowed_cents`/`risk_sum_cents`/`headroom_cents` can be computed.
///
/// When positions are present, they are sorted by `position_id` first
/// (matches the original's deterministic iteration order). Only
/// `status == "OPEN"` positions with a present, non-negative `max_loss_cents`
/// are summed into `risk_sum`; any other `OPEN` position with an absent or
/// invalid `max_loss_cents` makes the risk sum unavailable
/// (`B2_OPEN_POSITION_MISSING_MAX_LOSS_FAILCLOSED`).
#[must_use]
pub fn evaluate(
    nav_total_cents: i64,
    drawdown_multiplier: Option<Decimal>,
    positions: &PositionsInput,
) -> CapitalRiskEnvelope {
    let mut reason_codes = Vec::new();

    let positions_invalid = matches!(positions, PositionsInput::Invalid);
    let drawdown_missing = drawdown_multiplier.is_none();

    if drawdown_missing {
        reason_codes.push("B2_DRAWDOWN_MISSING_FAILCLOSED".to_string());
    }
    if positions_invalid {
        reason_codes.push("B2_POSITIONS_ITEMS_INVALID_OR_MISSING".to_string());
    }
    if drawdown_missing && positions_invalid {
        reason_codes.push("B2_INPUTS_MISSING_FAILCLOSED".to_string());
    }

    let items: &[Position] = match positions {
        PositionsInput::Items(items) => items,
        PositionsInput::Invalid => &[],
    };

    let mut sorted: Vec<&Position> = items.iter().collect();
    sorted.sort_by(|a, b| a.position_id.cmp(&b.position_id));

    let mut all_have_max_loss = true;
    let mut risk_sum: i64 = 0;
    let mut breakdown = Vec::with_capacity(sorted.len());

    for p in &sorted {
        let is_open = p.status == "OPEN";
        let included = is_open && p.max_loss_cents.is_some_and(|v| v >= 0);
        if is_open && !included {
            all_have_max_loss = false;
        }
        if included {
            risk_sum += p.max_loss_cents.unwrap_or(0);
        }
        breakdown.push(PositionBreakdown {
            position_id: p.position_id.clone(),
            status: p.status.clone(),
            max_loss_cents: p.max_loss_cents,
            included_in_risk_sum: included,
        });
    }

    if !positions_invalid && !all_have_max_loss {
        reason_codes.push("B2_OPEN_POSITION_MISSING_MAX_LOSS_FAILCLOSED".to_string());
    }

    let allowed = drawdown_multiplier.map(|mult| {
        let base_pct = Decimal::from_scaled(i128::from(BASE_ENVELOPE_PCT_SCALED_4), 4);
        Decimal::exact(nav_total_cents, 0)
            .checked_mul(base_pct)
            .checked_mul(mult)
            .floor_to_i64()
    });

    let risk_sum_opt = if !positions_invalid && all_have_max_loss {
        Some(risk_sum)
    } else {
        None
    };
    let headroom = match (allowed, risk_sum_opt) {
        (Some(allowed), Some(rs)) => Some(allowed - rs),
        _ => None,
    };

    if let (Some(allowed), Some(rs)) = (allowed, risk_sum_opt) {
        if rs > allowed {
            reason_codes.push("B2_PORTFOLIO_CAPITAL_AT_RISK_EXCEEDS_ENVELOPE".to_string());
        }
    }

    reason_codes.sort();
    reason_codes.dedup();

    CapitalRiskEnvelope {
        nav_total_cents,
        drawdown_multiplier,
        allowed_cents: allowed,
        risk_sum_cents: risk_sum_opt,
        headroom_cents: headroom,
        reason_codes,
        breakdown,
    }
}

/// Write the day's capital-at-risk envelope artifact.
///
/// # Errors
///
/// Propagates [`StageError`] from the kernel envelope/writer/schema layers.
pub fn write_capital_risk_envelope(
    day_utc: &DayUtc,
    truth_root: &TruthRoot,
    producer: &Producer,
    schemas: &SchemaStore,
    schema_path: &str,
    envelope: &CapitalRiskEnvelope,
    input_manifest: Vec<InputManifestEntry>,
) -> Result<WriteResult, StageError> {
    let breakdown_json: Vec<serde_json::Value> = envelope
        .breakdown
        .iter()
        .map(|b| {
            serde_json::json!({
                "position_id": b.position_id,
                "status": b.status,
                "max_loss_cents": b.max_loss_cents,
                "included_in_risk_sum": b.included_in_risk_sum,
            })
        })
        .collect();

    let field = serde_json::json!({
        "nav_total_cents": envelope.nav_total_cents,
        "base_envelope_pct": "0.0200",
        "drawdown_multiplier": envelope.drawdown_multiplier.map(Decimal::to_decimal_string),
        "allowed_cents": envelope.allowed_cents,
        "risk_sum_cents": envelope.risk_sum_cents,
        "headroom_cents": envelope.headroom_cents,
        "positions": breakdown_json,
    });

    let builder = ArtifactBuilder::new(
        "capital_risk_envelope",
        "v2",
        day_utc,
        producer,
        "canonical_json_hash",
    )
    .status(envelope.status())
    .reason_codes(envelope.reason_codes.clone())
    .with_inputs(input_manifest)
    .field("envelope", field);

    let path = truth_root.artifact_path(
        "risk_v1/capital_risk_envelope",
        day_utc.as_str(),
        "capital_risk_envelope.json",
    );
    builder
        .finalize_and_write(schemas, schema_path, &path)
        .map_err(StageError::from)
}
