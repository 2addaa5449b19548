//! `DayUtc`: a validated `YYYY-MM-DD` day key, newtyped to keep day keys from
//! mixing with arbitrary strings at module boundaries (distilled spec §9).
//!
//! Validation follows the original system's algorithm exactly: a structural
//! check (length 10, separators at positions 4 and 7, digits elsewhere)
//! followed by a **lexicographic string comparison** against today's UTC
//! date. Zero-padded ISO dates compare correctly as strings, so no date
//! arithmetic library is needed for the future-day check.

use crate::error::CoreError;

/// A validated `YYYY-MM-DD` day key that has been checked not to lie in the
/// future relative to the current UTC calendar date.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayUtc(String);

impl DayUtc {
    /// Parse and validate a day key against `today`, a `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::BadDayUtc`] if `s` is not `YYYY-MM-DD`-shaped, or
    /// if `s > today` lexicographically.
    pub fn parse_against(s: &str, today: &str) -> Result<Self, CoreError> {
        validate_shape(s)?;
        if s > today {
            return Err(CoreError::BadDayUtc {
                detail: format!("future_day_utc_disallowed day_utc={s} today_utc={today}"),
            });
        }
        Ok(Self(s.to_string()))
    }

    /// Parse and validate a day key against the current wall-clock UTC date.
    ///
    /// # Errors
    ///
    /// See [`DayUtc::parse_against`].
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        Self::parse_against(s, &today_utc_string())
    }

    /// The `YYYY-MM-DD` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `produced_utc` for a rerunnable day-keyed artifact: `day_utc + "T00:00:00Z"`.
    #[must_use]
    pub fn idempotent_produced_utc(&self) -> String {
        format!("{}T00:00:00Z", self.0)
    }
}

impl std::fmt::Display for DayUtc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_shape(s: &str) -> Result<(), CoreError> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 {
        return Err(CoreError::BadDayUtc {
            detail: format!("bad_day_utc_format_expected_yyyy_mm_dd: {s:?}"),
        });
    }
    let ok = bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes[0..4].iter().all(u8::is_ascii_digit)
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[8..10].iter().all(u8::is_ascii_digit);
    if !ok {
        return Err(CoreError::BadDayUtc {
            detail: format!("bad_day_utc_format_expected_yyyy_mm_dd: {s:?}"),
        });
    }
    Ok(())
}

/// Today's UTC calendar date as `YYYY-MM-DD`, derived from the Unix epoch via
/// Howard Hinnant's `civil_from_days` algorithm (no calendar library needed).
#[must_use]
pub fn today_utc_string() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock is after the Unix epoch")
        .as_secs();
    let days = (secs / 86_400) as i64;
    let (y, m, d) = civil_from_days(days);
    format!("{y:04}-{m:02}-{d:02}")
}

/// Convert a day count since the Unix epoch (1970-01-01) to a `(year, month, day)`
/// proleptic-Gregorian civil date. Reference: howardhinnant.github.io/date_algorithms.html
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365; // [0, 399]
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32; // [1, 31]
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32; // [1, 12]
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}
