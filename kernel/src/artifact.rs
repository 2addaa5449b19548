//! Artifact envelope construction (distilled spec §3.2, §4.3).
//!
//! A builder accumulates envelope fields, then `finalize` nulls the self-hash
//! field, validates against the governed schema, computes
//! `H_excluding(obj, {self_hash_field})`, assigns it, canonically encodes,
//! and delegates to the immutable writer. Schema validation is a
//! precondition of `finalize` (distilled spec §9 design note).

use crate::day::DayUtc;
use crate::error::CoreError;
use crate::hash::canonical_hash_excluding;
use crate::manifest::{sort_entries, InputManifestEntry};
use crate::schema::SchemaStore;
use crate::writer::{write_immutable, WriteResult};
use std::path::Path;

/// Producer identity embedded in every governance-grade artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Producer {
    pub repo: String,
    pub git_sha: String,
    pub module: String,
}

impl Producer {
    /// Construct a producer identity. `git_sha` is taken verbatim if present
    /// (40-hex or `"UNKNOWN"`), never inferred by reading `.git` — the caller
    /// (CLI/config layer) is responsible for resolving the real revision.
    #[must_use]
    pub fn new(repo: impl Into<String>, git_sha: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            git_sha: git_sha.into(),
            module: module.into(),
        }
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "repo": self.repo,
            "git_sha": self.git_sha,
            "module": self.module,
        })
    }
}

/// Builds an artifact envelope. The self-hash field name is fixed at
/// construction time (commonly `"canonical_json_hash"`).
pub struct ArtifactBuilder {
    self_hash_field: String,
    fields: serde_json::Map<String, serde_json::Value>,
    manifest: Vec<InputManifestEntry>,
}

impl ArtifactBuilder {
    /// Start a new envelope for `schema_id`/`schema_version` at `day_utc`.
    #[must_use]
    pub fn new(
        schema_id: &str,
        schema_version: &str,
        day_utc: &DayUtc,
        producer: &Producer,
        self_hash_field: &str,
    ) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("schema_id".into(), schema_id.into());
        fields.insert("schema_version".into(), schema_version.into());
        fields.insert("day_utc".into(), day_utc.as_str().into());
        fields.insert(
            "produced_utc".into(),
            day_utc.idempotent_produced_utc().into(),
        );
        fields.insert("producer".into(), producer.to_json());
        fields.insert(self_hash_field.to_string(), serde_json::Value::Null);
        Self {
            self_hash_field: self_hash_field.to_string(),
            fields,
            manifest: Vec::new(),
        }
    }

    /// Override `produced_utc` for append-only/log artifacts, where
    /// wall-clock timestamps are permitted (distilled spec §3.2).
    #[must_use]
    pub fn with_wall_clock_produced_utc(mut self, produced_utc: impl Into<String>) -> Self {
        self.fields
            .insert("produced_utc".into(), produced_utc.into().into());
        self
    }

    /// Set the closed-vocabulary `status` field.
    #[must_use]
    pub fn status(mut self, status: &str) -> Self {
        self.fields.insert("status".into(), status.into());
        self
    }

    /// Set sorted, deduplicated `reason_codes`.
    #[must_use]
    pub fn reason_codes(mut self, mut codes: Vec<String>) -> Self {
        codes.sort();
        codes.dedup();
        self.fields.insert(
            "reason_codes".into(),
            serde_json::Value::Array(codes.into_iter().map(serde_json::Value::String).collect()),
        );
        self
    }

    /// Append input manifest entries (sorted by `(type, path)` at finalize time).
    #[must_use]
    pub fn with_inputs(mut self, entries: Vec<InputManifestEntry>) -> Self {
        self.manifest.extend(entries);
        self
    }

    /// Set an arbitrary stage-specific field (e.g. `"envelope"`, `"checks"`).
    #[must_use]
    pub fn field(mut self, name: &str, value: serde_json::Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Validate, self-hash, canonically encode, and write the artifact
    /// immutably to `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::SchemaInvalid`] if `schemas` rejects the document.
    /// - [`CoreError::CanonicalizationFailed`] if encoding fails.
    /// - Writer errors from [`write_immutable`].
    pub fn finalize_and_write(
        mut self,
        schemas: &SchemaStore,
        schema_path: &str,
        path: &Path,
    ) -> Result<WriteResult, CoreError> {
        sort_entries(&mut self.manifest);
        self.fields.insert(
            "input_manifest".into(),
            serde_json::Value::Array(self.manifest.iter().map(InputManifestEntry::to_json).collect()),
        );

        let unfinalized = serde_json::Value::Object(self.fields.clone());
        schemas.validate(schema_path, &unfinalized)?;

        let self_hash = canonical_hash_excluding(&unfinalized, &[&self.self_hash_field])?;
        self.fields.insert(
            self.self_hash_field.clone(),
            serde_json::Value::String(self_hash.as_str().to_string()),
        );

        let finalized = serde_json::Value::Object(self.fields);
        schemas.validate(schema_path, &finalized)?;

        let bytes = crate::codec::canonical_json_file_bytes(&finalized)?;
        write_immutable(path, &bytes)
    }
}
