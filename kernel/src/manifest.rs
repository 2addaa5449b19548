//! Input manifest protocol: every input a stage writer reads (or fails to
//! find) is recorded, never silently omitted (distilled spec §3.3).

use crate::error::CoreError;
use crate::hash::{sha256_bytes, ContentHash};
use std::path::Path;

/// One entry in an artifact's `input_manifest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputManifestEntry {
    pub type_: String,
    pub path: String,
    pub sha256: ContentHash,
    pub day_utc: Option<String>,
    pub producer: Option<String>,
}

impl InputManifestEntry {
    /// An entry for an input that was actually read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingInput`] if `path` cannot be read.
    pub fn from_file(type_: &str, path: &Path) -> Result<Self, CoreError> {
        let sha256 = sha256_file(path).map_err(|e| CoreError::MissingInput {
            detail: format!("{}: {e}", path.display()),
        })?;
        Ok(Self {
            type_: type_.to_string(),
            path: path.display().to_string(),
            sha256,
            day_utc: None,
            producer: None,
        })
    }

    /// An entry for an input that was read from a directory, hashed as a
    /// canonical listing of `{rel_path, sha256(file)}` rows sorted by `rel_path`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingInput`] if `dir` cannot be walked.
    pub fn from_directory(type_: &str, dir: &Path) -> Result<Self, CoreError> {
        let sha256 = sha256_dir_listing(dir).map_err(|e| CoreError::MissingInput {
            detail: format!("{}: {e}", dir.display()),
        })?;
        Ok(Self {
            type_: type_.to_string(),
            path: dir.display().to_string(),
            sha256,
            day_utc: None,
            producer: None,
        })
    }

    /// An entry recording that a *required* input was absent. `type_` is
    /// suffixed `_missing`; `sha256` is the zero-sha-of-empty sentinel. The
    /// entry still appears in the manifest — it is never omitted.
    #[must_use]
    pub fn missing(type_: &str, path: &str) -> Self {
        Self {
            type_: format!("{type_}_missing"),
            path: path.to_string(),
            sha256: sha256_bytes(b""),
            day_utc: None,
            producer: None,
        }
    }

    /// Attach the day key this input was produced for.
    #[must_use]
    pub fn with_day_utc(mut self, day_utc: impl Into<String>) -> Self {
        self.day_utc = Some(day_utc.into());
        self
    }

    /// Attach the producer identity of the upstream artifact.
    #[must_use]
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = Some(producer.into());
        self
    }

    /// Render as a JSON object for embedding in an artifact envelope.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert("type".into(), serde_json::Value::String(self.type_.clone()));
        obj.insert("path".into(), serde_json::Value::String(self.path.clone()));
        obj.insert(
            "sha256".into(),
            serde_json::Value::String(self.sha256.as_str().to_string()),
        );
        if let Some(day_utc) = &self.day_utc {
            obj.insert("day_utc".into(), serde_json::Value::String(day_utc.clone()));
        }
        if let Some(producer) = &self.producer {
            obj.insert(
                "producer".into(),
                serde_json::Value::String(producer.clone()),
            );
        }
        serde_json::Value::Object(obj)
    }
}

/// Sort manifest entries by `(type, path)` — the sole total order the
/// distilled spec requires (§3.3, §4.4 replay hash, §8 round-trip law).
pub fn sort_entries(entries: &mut [InputManifestEntry]) {
    entries.sort_by(|a, b| (&a.type_, &a.path).cmp(&(&b.type_, &b.path)));
}

/// SHA-256 of a file's bytes.
///
/// # Errors
///
/// Propagates the underlying `std::io::Error`.
pub fn sha256_file(path: &Path) -> std::io::Result<ContentHash> {
    let bytes = std::fs::read(path)?;
    Ok(sha256_bytes(&bytes))
}

/// SHA-256 of a directory's canonical listing: sorted `{rel_path, sha256(file)}`
/// rows, one per regular file found by a recursive walk.
///
/// # Errors
///
/// Propagates the underlying `std::io::Error` from walking or reading files.
pub fn sha256_dir_listing(dir: &Path) -> std::io::Result<ContentHash> {
    let mut rows: Vec<(String, ContentHash)> = Vec::new();
    walk(dir, dir, &mut rows)?;
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    let array: Vec<serde_json::Value> = rows
        .into_iter()
        .map(|(rel_path, sha256)| {
            serde_json::json!({"rel_path": rel_path, "sha256": sha256.as_str()})
        })
        .collect();
    let bytes = crate::codec::canonical_json_bytes(&serde_json::Value::Array(array))
        .expect("directory listing rows are always canonicalizable");
    Ok(sha256_bytes(&bytes))
}

fn walk(
    root: &Path,
    dir: &Path,
    rows: &mut Vec<(String, ContentHash)>,
) -> std::io::Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(std::fs::DirEntry::file_name);
    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk(root, &path, rows)?;
        } else if file_type.is_file() {
            let sha256 = sha256_file(&path)?;
            let rel_path = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            rows.push((rel_path, sha256));
        }
    }
    Ok(())
}
