//! Canonical hashing: `H(obj)` and `H_excluding(obj, fields)`.
//!
//! **Exactly one place defines canonical hashing.** Both functions route
//! through [`crate::codec::canonical_json_bytes`] — there is no second JSON
//! serializer anywhere near a hash computation.

use crate::codec::{canonical_json_bytes, CanonError};
use sha2::{Digest, Sha256};

/// A content-addressed hash with algorithm identifier.
///
/// Format: `"algorithm:hex_digest"` (e.g., `"sha256:abcdef..."`).
///
/// Invariant: the inner string always contains exactly one `:` separator,
/// with non-empty substrings on both sides (enforced by [`ContentHash::parse`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    full: String,
    colon: usize,
}

impl ContentHash {
    /// Parse from `"algorithm:hex_digest"` format.
    ///
    /// Validation rules:
    /// - Exactly one `:` separator.
    /// - Algorithm: non-empty, ASCII lowercase alphanumeric only.
    /// - Digest: non-empty, lowercase hex only (`[0-9a-f]+`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let colon = s.find(':')?;
        if s[colon + 1..].contains(':') {
            return None;
        }

        let algorithm = &s[..colon];
        let digest = &s[colon + 1..];

        if algorithm.is_empty()
            || !algorithm
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        {
            return None;
        }

        if digest.is_empty()
            || !digest
                .bytes()
                .all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase())
        {
            return None;
        }

        Some(Self {
            full: s.to_string(),
            colon,
        })
    }

    /// The algorithm portion (e.g. `"sha256"`).
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.full[..self.colon]
    }

    /// The hex digest portion.
    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.full[self.colon + 1..]
    }

    /// The full `"algorithm:hex_digest"` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }

    fn from_sha256(digest: sha2::digest::Output<Sha256>) -> Self {
        let hex = hex::encode(digest);
        let full = format!("sha256:{hex}");
        Self { full, colon: 6 }
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}

/// `sha256` of raw bytes, formatted `"sha256:<hex>"`.
#[must_use]
pub fn sha256_bytes(data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    ContentHash::from_sha256(hasher.finalize())
}

/// `H(obj)`: SHA-256 of the canonical bytes of `obj` (without trailing newline).
///
/// # Errors
///
/// Returns [`CanonError`] if `obj` contains a forbidden fractional number.
pub fn canonical_hash(obj: &serde_json::Value) -> Result<ContentHash, CanonError> {
    let bytes = canonical_json_bytes(obj)?;
    Ok(sha256_bytes(&bytes))
}

/// `H_excluding(obj, field_names)`: SHA-256 of the canonical bytes of `obj`
/// with the named top-level fields replaced by `null`.
///
/// Used for artifact self-hashing: the self-hash field itself is always one
/// of the excluded names, so the hash is stable under its own assignment.
///
/// # Errors
///
/// Returns [`CanonError`] if `obj` contains a forbidden fractional number, or
/// if `obj` is not a JSON object.
pub fn canonical_hash_excluding(
    obj: &serde_json::Value,
    field_names: &[&str],
) -> Result<ContentHash, CanonError> {
    let mut nulled = obj.clone();
    if let serde_json::Value::Object(map) = &mut nulled {
        for name in field_names {
            if map.contains_key(*name) {
                map.insert((*name).to_string(), serde_json::Value::Null);
            }
        }
    }
    canonical_hash(&nulled)
}
