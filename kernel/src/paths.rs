//! `TruthRoot` and `ArtifactPath`: newtype wrappers that keep truth-root-relative
//! and absolute paths from mixing at module boundaries (distilled spec §9 design
//! note; also closes the §9 open question that truth-root must be a first-class
//! configured input, never a hardcoded absolute path).

use std::path::{Path, PathBuf};

/// The configured root directory under which all truth artifacts live.
///
/// Always constructed explicitly by the caller (CLI flag, config file, or
/// test fixture) — this crate never hardcodes a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthRoot(PathBuf);

impl TruthRoot {
    /// Wrap an existing directory path as the truth root. Does not require
    /// the directory to exist yet (the immutable writer creates parents).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// The underlying filesystem path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// `<truth_root>/<kind_root>/<day_utc>/<file_name>`.
    #[must_use]
    pub fn artifact_path(&self, kind_root: &str, day_utc: &str, file_name: &str) -> PathBuf {
        self.0.join(kind_root).join(day_utc).join(file_name)
    }

    /// Path relative to the truth root, if `path` is in fact under it.
    #[must_use]
    pub fn relativize(&self, path: &Path) -> Option<PathBuf> {
        path.strip_prefix(&self.0).ok().map(Path::to_path_buf)
    }
}
