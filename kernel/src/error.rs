//! `CoreError`: the error taxonomy for the truth-artifact engine.
//!
//! Each variant is one taxonomy kind. Plain enum, manual `Display`, trivial
//! `Error` impl — no `thiserror`. This matches the rest of the workspace's
//! existing error-type idiom.

/// Fail-closed error taxonomy. See distilled spec §7 for triggers and policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Malformed or future `day_utc`.
    BadDayUtc { detail: String },
    /// A required upstream artifact (or declared input) is absent.
    MissingInput { detail: String },
    /// Output (or input) violates its governed JSON Schema.
    SchemaInvalid { detail: String },
    /// A float or other forbidden value was encountered during encoding.
    CanonicalizationFailed { detail: String },
    /// Destination path exists but is not a regular file.
    TargetNotFile { path: String },
    /// Existing file bytes differ from the candidate bytes.
    AttemptedRewrite {
        path: String,
        existing_sha256: String,
        candidate_sha256: String,
    },
    /// A declared upstream SHA-256 disagrees with what's on disk.
    HashMismatch {
        path: String,
        expected_sha256: String,
        actual_sha256: String,
    },
    /// Envelope breach, gate precedence breach, or other policy violation.
    PolicyViolation { detail: String },
    /// A network or broker-adapter collaborator is unavailable.
    ExternalUnavailable { detail: String },
}

impl CoreError {
    /// The taxonomy code (e.g. `"BAD_DAY_UTC"`), for `FAIL: <CODE>: <detail>` logging.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadDayUtc { .. } => "BAD_DAY_UTC",
            Self::MissingInput { .. } => "MISSING_INPUT",
            Self::SchemaInvalid { .. } => "SCHEMA_INVALID",
            Self::CanonicalizationFailed { .. } => "CANONICALIZATION_FAILED",
            Self::TargetNotFile { .. } => "TARGET_NOT_FILE",
            Self::AttemptedRewrite { .. } => "ATTEMPTED_REWRITE",
            Self::HashMismatch { .. } => "HASH_MISMATCH",
            Self::PolicyViolation { .. } => "POLICY_VIOLATION",
            Self::ExternalUnavailable { .. } => "EXTERNAL_UNAVAILABLE",
        }
    }

    /// The process exit code this error maps to (distilled spec §6.3):
    /// `4` for immutability violations, `2` for everything else fail-closed.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AttemptedRewrite { .. } => 4,
            _ => 2,
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadDayUtc { detail } => write!(f, "{}: {detail}", self.code()),
            Self::MissingInput { detail } => write!(f, "{}: {detail}", self.code()),
            Self::SchemaInvalid { detail } => write!(f, "{}: {detail}", self.code()),
            Self::CanonicalizationFailed { detail } => write!(f, "{}: {detail}", self.code()),
            Self::TargetNotFile { path } => write!(f, "{}: path={path}", self.code()),
            Self::AttemptedRewrite {
                path,
                existing_sha256,
                candidate_sha256,
            } => write!(
                f,
                "{}: path={path} existing_sha256={existing_sha256} candidate_sha256={candidate_sha256}",
                self.code()
            ),
            Self::HashMismatch {
                path,
                expected_sha256,
                actual_sha256,
            } => write!(
                f,
                "{}: path={path} expected_sha256={expected_sha256} actual_sha256={actual_sha256}",
                self.code()
            ),
            Self::PolicyViolation { detail } => write!(f, "{}: {detail}", self.code()),
            Self::ExternalUnavailable { detail } => write!(f, "{}: {detail}", self.code()),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<crate::codec::CanonError> for CoreError {
    fn from(e: crate::codec::CanonError) -> Self {
        Self::CanonicalizationFailed {
            detail: e.to_string(),
        }
    }
}
