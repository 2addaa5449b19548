//! Governed schema validation (distilled spec §6.2).
//!
//! Each artifact kind has a Draft 2020-12 JSON Schema document at a
//! well-known repository path. A missing schema file is fatal
//! (`EXTERNAL_UNAVAILABLE`); a schema that fails to compile, or a document
//! that fails validation, is `SCHEMA_INVALID`. This crate has exactly one
//! schema-validation call site; the `jsonschema` dependency does not leak
//! beyond this module.

use crate::error::CoreError;
use std::collections::HashMap;
use std::sync::Mutex;

/// Caches parsed schema documents by repository-relative path so a day's
/// pipeline run compiles each governed schema once per process.
pub struct SchemaStore {
    cache: Mutex<HashMap<String, serde_json::Value>>,
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Validate `instance` against the schema at `schema_path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::ExternalUnavailable`] if the schema file cannot be read.
    /// - [`CoreError::SchemaInvalid`] if the schema fails to compile or
    ///   `instance` violates it.
    pub fn validate(
        &self,
        schema_path: &str,
        instance: &serde_json::Value,
    ) -> Result<(), CoreError> {
        let schema = self.load(schema_path)?;
        let validator = jsonschema::validator_for(&schema).map_err(|e| CoreError::SchemaInvalid {
            detail: format!("schema_path={schema_path} compile_error={e}"),
        })?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| e.to_string())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::SchemaInvalid {
                detail: format!("schema_path={schema_path} errors={}", errors.join("; ")),
            })
        }
    }

    fn load(&self, schema_path: &str) -> Result<serde_json::Value, CoreError> {
        if let Some(cached) = self.cache.lock().unwrap().get(schema_path) {
            return Ok(cached.clone());
        }
        let bytes = std::fs::read(schema_path).map_err(|e| CoreError::ExternalUnavailable {
            detail: format!("missing governed schema schema_path={schema_path}: {e}"),
        })?;
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| CoreError::SchemaInvalid {
                detail: format!("schema_path={schema_path} parse_error={e}"),
            })?;
        self.cache
            .lock()
            .unwrap()
            .insert(schema_path.to_string(), value.clone());
        Ok(value)
    }
}
