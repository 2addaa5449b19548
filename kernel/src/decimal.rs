//! Fixed-point decimal arithmetic for stage writers.
//!
//! Distilled spec §4.4 forbids binary floating point for financial
//! quantities. This module represents decimals as scaled `i128` integers
//! (value = `scaled / 10^scale`) and renders them as the fixed-width decimal
//! *strings* the canonical codec requires (§3.1: fractional values are
//! base-10 decimal strings, never JSON numbers).
//!
//! Quantization is always half-up (round-half-away-from-zero), matching the
//! original system's `Decimal.quantize(..., rounding=ROUND_HALF_UP)` and
//! `ROUND_FLOOR` calls.

/// A decimal value scaled to a fixed number of places, stored as `i128`.
///
/// `Decimal { scaled: 15, scale: 2 }` represents `0.15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Decimal {
    scaled: i128,
    scale: u32,
}

impl Decimal {
    /// Construct directly from a pre-scaled integer.
    #[must_use]
    pub const fn from_scaled(scaled: i128, scale: u32) -> Self {
        Self { scaled, scale }
    }

    /// Construct from an `i64` numerator over `10^scale`, i.e. an exact
    /// fixed-point value with no rounding (e.g. `Decimal::exact(150, 3)` == `0.150`).
    #[must_use]
    pub fn exact(numerator: i64, scale: u32) -> Self {
        Self {
            scaled: i128::from(numerator),
            scale,
        }
    }

    /// Divide two `i64` integers and round half-up to `scale` decimal places.
    ///
    /// Returns `None` if `denominator == 0`.
    #[must_use]
    pub fn div_round_half_up(numerator: i64, denominator: i64, scale: u32) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let pow = 10i128.pow(scale);
        // value = numerator/denominator, we want round(value * pow)
        let num = i128::from(numerator) * pow;
        let den = i128::from(denominator);
        Some(Self {
            scaled: round_half_up_div(num, den),
            scale,
        })
    }

    /// Rescale to a (typically coarser) target scale, rounding half-up.
    #[must_use]
    pub fn rescale(self, target_scale: u32) -> Self {
        if target_scale == self.scale {
            return self;
        }
        if target_scale > self.scale {
            let factor = 10i128.pow(target_scale - self.scale);
            return Self {
                scaled: self.scaled * factor,
                scale: target_scale,
            };
        }
        let factor = 10i128.pow(self.scale - target_scale);
        Self {
            scaled: round_half_up_div(self.scaled, factor),
            scale: target_scale,
        }
    }

    /// Clamp into `[lo, hi]` (all three must share the same scale).
    #[must_use]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        assert_eq!(self.scale, lo.scale);
        assert_eq!(self.scale, hi.scale);
        Self {
            scaled: self.scaled.clamp(lo.scaled, hi.scaled),
            scale: self.scale,
        }
    }

    /// Multiply two decimals, result scale is the sum of input scales.
    #[must_use]
    pub fn checked_mul(self, other: Self) -> Self {
        Self {
            scaled: self.scaled * other.scaled,
            scale: self.scale + other.scale,
        }
    }

    /// Floor-divide the integer value of this decimal by `10^scale`, i.e.
    /// `floor(self)` as an `i64`. Used for `allowed = floor(nav_total_cents * pct * mult)`.
    #[must_use]
    pub fn floor_to_i64(self) -> i64 {
        let pow = 10i128.pow(self.scale);
        let q = self.scaled.div_euclid(pow);
        q as i64
    }

    /// Render as a fixed-width decimal string, e.g. `-0.150000`.
    #[must_use]
    pub fn to_decimal_string(self) -> String {
        let pow = 10i128.pow(self.scale);
        let negative = self.scaled < 0;
        let abs = self.scaled.unsigned_abs();
        let whole = abs / pow as u128;
        let frac = abs % pow as u128;
        let sign = if negative && (whole != 0 || frac != 0) {
            "-"
        } else {
            ""
        };
        if self.scale == 0 {
            format!("{sign}{whole}")
        } else {
            format!("{sign}{whole}.{frac:0width$}", width = self.scale as usize)
        }
    }

    /// The underlying scale (number of decimal places).
    #[must_use]
    pub const fn scale(self) -> u32 {
        self.scale
    }

    /// The raw scaled integer (`value * 10^scale`). Escape hatch for callers
    /// that need to accumulate across decimals of a known common scale
    /// without repeated string round-tripping.
    #[must_use]
    pub const fn scaled_value(self) -> i128 {
        self.scaled
    }

    /// Absolute value, same scale.
    #[must_use]
    pub fn abs(self) -> Self {
        Self {
            scaled: self.scaled.abs(),
            scale: self.scale,
        }
    }
}

/// Round `num / den` to the nearest integer, half-up (away from zero).
/// Rounds on the magnitude `|num| / den` and reapplies the sign afterward, so
/// a negative half-tie rounds to a larger-magnitude negative result rather
/// than toward positive infinity.
fn round_half_up_div(num: i128, den: i128) -> i128 {
    debug_assert!(den > 0);
    let negative = num < 0;
    let magnitude = num.unsigned_abs();
    let den_abs = den.unsigned_abs();
    let q = magnitude / den_abs;
    let r = magnitude % den_abs;
    let rounded = if r * 2 >= den_abs { q + 1 } else { q };
    let rounded = i128::try_from(rounded).expect("rounded magnitude fits i128");
    if negative {
        -rounded
    } else {
        rounded
    }
}

/// The fixed drawdown -> multiplier table (distilled spec §4.4, boundaries
/// inclusive via `<=`, cross-checked against the original's
/// `_multiplier_from_drawdown`).
#[must_use]
pub fn drawdown_multiplier(drawdown_pct_6dp: Decimal) -> Decimal {
    let d = drawdown_pct_6dp.rescale(6);
    let threshold = |v: i128| Decimal::from_scaled(v, 6);
    if d <= threshold(-150_000) {
        Decimal::from_scaled(25, 2)
    } else if d <= threshold(-100_000) {
        Decimal::from_scaled(50, 2)
    } else if d <= threshold(-50_000) {
        Decimal::from_scaled(75, 2)
    } else {
        Decimal::from_scaled(100, 2)
    }
}
