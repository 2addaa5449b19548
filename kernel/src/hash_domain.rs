//! Typed domain separators for internal content-addressing that sits outside
//! the artifact self-hash protocol (§3.1's `H`/`H_excluding` are intentionally
//! domain-free — they hash exactly the canonical bytes a schema validates).
//!
//! Submission bundles and the pipeline manifest's cross-artifact digest are
//! not governed-schema documents in their own right; domain separation keeps
//! their digests from ever colliding with an artifact's own self-hash or with
//! each other even if the underlying bytes happened to coincide.

/// Declares `HashDomain` enum, `as_bytes()`, `ALL`, and `Display` from one list.
macro_rules! define_hash_domains {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $bytes:expr
        ),+ $(,)?
    ) => {
        /// Typed domain separator for [`domain_hash`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $(
                $(#[$meta])*
                $variant,
            )+
        }

        impl HashDomain {
            /// The raw domain-separator bytes (null-terminated).
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $( Self::$variant => $bytes, )+
                }
            }

            /// All domain variants in declaration order.
            pub const ALL: &[HashDomain] = &[
                $( Self::$variant, )+
            ];
        }

        impl core::fmt::Display for HashDomain {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $( Self::$variant => write!(f, stringify!($variant)), )+
                }
            }
        }
    };
}

define_hash_domains! {
    /// Submission bundle digest (normative-artifact projection under a
    /// submission directory).
    SubmissionBundleDigest => b"TRUTH::SUBMISSION_BUNDLE_DIGEST::V1\0",

    /// Pipeline manifest cross-artifact digest for a day.
    PipelineManifestDigest => b"TRUTH::PIPELINE_MANIFEST_DIGEST::V1\0",
}

/// Compute `sha256(domain.as_bytes() || data)`, returned as a [`crate::hash::ContentHash`].
#[must_use]
pub fn domain_hash(domain: HashDomain, data: &[u8]) -> crate::hash::ContentHash {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    hasher.update(data);
    let hex = hex::encode(hasher.finalize());
    crate::hash::ContentHash::parse(&format!("sha256:{hex}"))
        .expect("sha256 hex digest always parses")
}
