//! Typed stage errors.

use truth_kernel::error::CoreError;

/// Typed failure for a stage writer. Wraps [`CoreError`] plus stage-specific
/// fail-closed conditions the distilled spec calls out by name
/// (e.g. the `DIV0_*` daily-return condition, §4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// A core-layer error (codec, writer, schema, day-key).
    Core(CoreError),

    /// `nav_total_{t-1} == 0` and `Δpnl != 0`: daily return is undefined and
    /// must fail closed rather than silently default to zero or infinity.
    Div0DailyReturn { day_utc: String },

    /// A required declared input was absent (distinct from `MissingInput`
    /// in that the stage chose to fail rather than emit a `MISSING`-tagged
    /// manifest entry and continue).
    RequiredInputAbsent { role: String },
}

impl From<CoreError> for StageError {
    fn from(e: CoreError) -> Self {
        Self::Core(e)
    }
}

impl StageError {
    /// The taxonomy code, for `FAIL: <CODE>: <detail>` logging.
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::Core(e) => e.code().to_string(),
            Self::Div0DailyReturn { .. } => "DIV0_DAILY_RETURN".to_string(),
            Self::RequiredInputAbsent { .. } => "MISSING_INPUT".to_string(),
        }
    }

    /// The process exit code this error maps to.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Core(e) => e.exit_code(),
            _ => 2,
        }
    }
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Core(e) => write!(f, "{e}"),
            Self::Div0DailyReturn { day_utc } => {
                write!(f, "DIV0_DAILY_RETURN: day_utc={day_utc}")
            }
            Self::RequiredInputAbsent { role } => {
                write!(f, "MISSING_INPUT: required input absent role={role}")
            }
        }
    }
}

impl std::error::Error for StageError {}
