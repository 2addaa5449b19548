//! Runtime configuration (distilled spec §9 open questions; §10 ambient
//! stack). `Option<T>` fields resolved via `.unwrap_or(DEFAULT_*)`, the same
//! shape the teacher's policy-configuration module used for `PolicyConfig`.

use truth_kernel::artifact::Producer;
use truth_kernel::day::DayUtc;
use truth_kernel::paths::TruthRoot;

/// Fallback producer identity when no git revision can be resolved.
pub const DEFAULT_PRODUCER_GIT_SHA: &str = "UNKNOWN";

/// Fallback producer repository name.
pub const DEFAULT_PRODUCER_REPO: &str = "truth-engine";

/// Fallback producer module label, overridden per stage invocation.
pub const DEFAULT_PRODUCER_MODULE: &str = "truth-orchestrator::pipeline";

/// Which of a day's v1/v2/v3 artifact surfaces is authoritative.
///
/// Distilled spec §9: "some writers produce both a legacy v1 and newer v2/v3
/// variant of the same surface; the authoritative variant per day depends on
/// a registry whose future-enforcement date is a policy knob." This struct
/// makes that knob first-class configuration rather than an inferred value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantAuthorityRegistry {
    /// The variant authoritative before `future_enforcement_date` (if set).
    pub current_variant: String,
    /// The variant authoritative on and after `future_enforcement_date`.
    pub future_variant: Option<String>,
    /// The day on which `future_variant` becomes authoritative. `None` means
    /// `current_variant` is authoritative indefinitely.
    pub future_enforcement_date: Option<DayUtc>,
}

impl VariantAuthorityRegistry {
    /// A registry with no scheduled variant transition.
    #[must_use]
    pub fn fixed(current_variant: impl Into<String>) -> Self {
        Self {
            current_variant: current_variant.into(),
            future_variant: None,
            future_enforcement_date: None,
        }
    }

    /// The variant authoritative for `day_utc`, resolved by explicit
    /// configuration — never inferred from the artifact's own presence.
    #[must_use]
    pub fn authoritative_variant_for(&self, day_utc: &DayUtc) -> &str {
        match (&self.future_variant, &self.future_enforcement_date) {
            (Some(future), Some(cutover)) if day_utc >= cutover => future,
            _ => &self.current_variant,
        }
    }
}

/// Process-wide configuration for a pipeline invocation (distilled spec §10
/// ambient stack). Always constructed explicitly by the CLI layer; no field
/// is read from the environment implicitly.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub truth_root: TruthRoot,
    pub producer_repo: String,
    pub producer_git_sha: Option<String>,
    pub producer_module: String,
    pub variant_authority: VariantAuthorityRegistry,
}

impl RuntimeConfig {
    /// Construct configuration with the workspace defaults for everything
    /// except `truth_root`, which distilled spec §9 requires the caller
    /// supply explicitly (never hardcoded).
    #[must_use]
    pub fn new(truth_root: TruthRoot) -> Self {
        Self {
            truth_root,
            producer_repo: DEFAULT_PRODUCER_REPO.to_string(),
            producer_git_sha: None,
            producer_module: DEFAULT_PRODUCER_MODULE.to_string(),
            variant_authority: VariantAuthorityRegistry::fixed("v2"),
        }
    }

    #[must_use]
    pub fn with_producer_git_sha(mut self, git_sha: impl Into<String>) -> Self {
        self.producer_git_sha = Some(git_sha.into());
        self
    }

    #[must_use]
    pub fn with_producer_module(mut self, module: impl Into<String>) -> Self {
        self.producer_module = module.into();
        self
    }

    /// Build the `Producer` identity embedded in every artifact this
    /// process writes, resolving `producer_git_sha` to `"UNKNOWN"` if unset.
    #[must_use]
    pub fn producer(&self) -> Producer {
        Producer::new(
            self.producer_repo.clone(),
            self.producer_git_sha
                .clone()
                .unwrap_or_else(|| DEFAULT_PRODUCER_GIT_SHA.to_string()),
            self.producer_module.clone(),
        )
    }
}
