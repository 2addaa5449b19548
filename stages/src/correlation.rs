//! Engine correlation stage (supplemental — grounded in `_eval_corr` from
//! `run_systemic_risk_gate_v2.py`). The stage evaluates a correlation matrix
//! and flags pairwise correlations at or above a configured threshold;
//! `pearson_correlation` is the primitive that produces matrix entries from
//! aligned per-engine daily-return series.

use crate::error::StageError;
use truth_kernel::artifact::{ArtifactBuilder, Producer};
use truth_kernel::day::DayUtc;
use truth_kernel::decimal::Decimal;
use truth_kernel::manifest::InputManifestEntry;
use truth_kernel::paths::TruthRoot;
use truth_kernel::schema::SchemaStore;
use truth_kernel::writer::WriteResult;

/// One flagged engine pair, `|corr| >= threshold`.
#[derive(Debug, Clone)]
pub struct FlaggedPair {
    pub engine_a: String,
    pub engine_b: String,
    pub corr: Decimal,
}

/// The upstream matrix's closed-vocabulary status. `DegradedInsufficientHistory`
/// is only acceptable when the matrix is 1x1 (no pairwise risk is possible yet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixStatus {
    Ok,
    DegradedInsufficientHistory,
}

/// Pairwise Pearson correlation of two aligned daily-return series, clamped
/// to `[-1,1]` and quantized to 6dp. A degenerate series (zero variance on
/// either side) correlates as `0`, never `NaN` — there is no linear
/// relationship to measure against a constant series.
#[must_use]
pub fn pearson_correlation(series_a: &[Decimal], series_b: &[Decimal]) -> Decimal {
    let n = series_a.len().min(series_b.len());
    if n < 2 {
        return Decimal::exact(0, 6);
    }
    let scale = 12;
    let rescale = |d: &Decimal| d.rescale(scale).scaled_value();

    let sum_a: i128 = series_a[..n].iter().map(rescale).sum();
    let sum_b: i128 = series_b[..n].iter().map(rescale).sum();
    let n128 = i128::try_from(n).unwrap_or(i128::MAX);
    let mean_a = sum_a / n128;
    let mean_b = sum_b / n128;

    let mut cov: i128 = 0;
    let mut var_a: i128 = 0;
    let mut var_b: i128 = 0;
    for i in 0..n {
        let da = rescale(&series_a[i]) - mean_a;
        let db = rescale(&series_b[i]) - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    if var_a == 0 || var_b == 0 {
        return Decimal::exact(0, 6);
    }

    #[allow(clippy::cast_precision_loss)]
    let (cov_f, var_a_f, var_b_f) = (cov as f64, var_a as f64, var_b as f64);
    let r = (cov_f / (var_a_f.sqrt() * var_b_f.sqrt())).clamp(-1.0, 1.0);
    #[allow(clippy::cast_possible_truncation)]
    let scaled = (r * 1_000_000.0).round() as i128;
    Decimal::exact(i64::try_from(scaled.clamp(-1_000_000, 1_000_000)).unwrap_or(0), 6)
}

/// Evaluate a symmetric correlation matrix (`engine_ids[i]` rows, `corr[i][j]`
/// entries) against `threshold`. Returns `(passes, max_pairwise, flagged,
/// reason_codes)`.
#[must_use]
pub fn evaluate_correlation(
    matrix_status: MatrixStatus,
    engine_ids: &[String],
    corr: &[Vec<Decimal>],
    threshold: Decimal,
) -> (bool, Decimal, Vec<FlaggedPair>, Vec<String>) {
    let mut reason_codes = Vec::new();
    let n = engine_ids.len();
    let mut max_pair = Decimal::exact(0, 6);
    let mut flagged = Vec::new();

    let threshold_abs = threshold.abs();
    for i in 0..n {
        for j in (i + 1)..n {
            let c = corr[i][j];
            if c.abs() > max_pair.abs() {
                max_pair = c;
            }
            if c.abs() >= threshold_abs {
                flagged.push(FlaggedPair {
                    engine_a: engine_ids[i].clone(),
                    engine_b: engine_ids[j].clone(),
                    corr: c,
                });
            }
        }
    }

    if max_pair.abs() >= threshold_abs {
        reason_codes.push("CORRELATION_THRESHOLD_BREACH".to_string());
        return (false, max_pair, flagged, reason_codes);
    }

    if matrix_status == MatrixStatus::DegradedInsufficientHistory {
        if n != 1 {
            reason_codes.push("CORRELATION_DEGRADED_MULTI_ENGINE_BLOCKED".to_string());
            return (false, max_pair, flagged, reason_codes);
        }
        reason_codes.push("CORRELATION_DEGRADED_BOOTSTRAP_ACCEPTED".to_string());
    }

    (true, max_pair, flagged, reason_codes)
}

/// Write the day's correlation shock artifact.
///
/// # Errors
///
/// Propagates [`StageError`] from the kernel envelope/writer/schema layers.
pub fn write_correlation_shock(
    day_utc: &DayUtc,
    truth_root: &TruthRoot,
    producer: &Producer,
    schemas: &SchemaStore,
    schema_path: &str,
    passes: bool,
    max_pairwise: Decimal,
    threshold: Decimal,
    flagged: &[FlaggedPair],
    reason_codes: Vec<String>,
    input_manifest: Vec<InputManifestEntry>,
) -> Result<WriteResult, StageError> {
    let flagged_json: Vec<serde_json::Value> = flagged
        .iter()
        .map(|f| {
            serde_json::json!({
                "engine_a": f.engine_a,
                "engine_b": f.engine_b,
                "corr": f.corr.to_decimal_string(),
            })
        })
        .collect();

    let field = serde_json::json!({
        "max_pairwise": max_pairwise.to_decimal_string(),
        "threshold_max_pairwise": threshold.to_decimal_string(),
        "flagged_pairs_count": flagged.len(),
        "flagged_pairs": flagged_json,
    });

    let builder = ArtifactBuilder::new(
        "engine_correlation_shock",
        "v1",
        day_utc,
        producer,
        "canonical_json_hash",
    )
    .status(if passes { "OK" } else { "FAIL" })
    .reason_codes(reason_codes)
    .with_inputs(input_manifest)
    .field("envelope", field);

    let path = truth_root.artifact_path(
        "monitoring_v1/engine_correlation_shock",
        day_utc.as_str(),
        "engine_correlation_shock.json",
    );
    builder
        .finalize_and_write(schemas, schema_path, &path)
        .map_err(StageError::from)
}
