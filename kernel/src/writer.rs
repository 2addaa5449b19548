//! The immutable writer: atomic, write-once, identity-idempotent file
//! creation (distilled spec §4.2). Grounded in this workspace's prior
//! `bundle_dir::write_atomic` helper, upgraded with the `fsync` + refuse-if-
//! temp-exists discipline the distilled spec requires and that the original
//! `immut_write_v1.py` implements.

use crate::error::CoreError;
use crate::hash::sha256_bytes;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// What happened when [`write_immutable`] ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    /// The file did not exist; it was created.
    Wrote,
    /// The file already existed with byte-identical content; no I/O performed.
    SkipIdentical,
}

/// Result of a successful immutable write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    pub path: String,
    pub sha256: String,
    pub bytes_written: usize,
    pub action: WriteAction,
}

/// Write `bytes` to `path` under write-once, identity-idempotent discipline.
///
/// 1. If `path` exists:
///    - Not a regular file → [`CoreError::TargetNotFile`].
///    - `sha256(existing) == sha256(candidate)` → [`WriteAction::SkipIdentical`], no I/O.
///    - Otherwise → [`CoreError::AttemptedRewrite`].
/// 2. Else: create parent directories, write to `path.tmp` (refusing if it
///    already exists), `fsync` it, atomically rename to `path`.
///
/// On any failure during step 2 the temp file is removed; the observable
/// filesystem state before and after a failed call is identical.
///
/// # Errors
///
/// See the taxonomy above.
pub fn write_immutable(path: &Path, bytes: &[u8]) -> Result<WriteResult, CoreError> {
    let candidate_sha = sha256_bytes(bytes);

    if path.exists() {
        let metadata = std::fs::symlink_metadata(path).map_err(|e| CoreError::TargetNotFile {
            path: format!("{}: {e}", path.display()),
        })?;
        if !metadata.is_file() {
            return Err(CoreError::TargetNotFile {
                path: path.display().to_string(),
            });
        }
        let existing_bytes = std::fs::read(path).map_err(|e| CoreError::TargetNotFile {
            path: format!("{}: {e}", path.display()),
        })?;
        let existing_sha = sha256_bytes(&existing_bytes);
        if existing_sha == candidate_sha {
            return Ok(WriteResult {
                path: path.display().to_string(),
                sha256: existing_sha.as_str().to_string(),
                bytes_written: 0,
                action: WriteAction::SkipIdentical,
            });
        }
        return Err(CoreError::AttemptedRewrite {
            path: path.display().to_string(),
            existing_sha256: existing_sha.as_str().to_string(),
            candidate_sha256: candidate_sha.as_str().to_string(),
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CoreError::PolicyViolation {
            detail: format!("create_dir_all {}: {e}", parent.display()),
        })?;
    }

    let tmp_path = tmp_path_for(path);
    let write_result = write_temp_then_rename(path, &tmp_path, bytes);
    write_result.map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        CoreError::PolicyViolation {
            detail: format!("immutable write failed for {}: {e}", path.display()),
        }
    })?;

    Ok(WriteResult {
        path: path.display().to_string(),
        sha256: candidate_sha.as_str().to_string(),
        bytes_written: bytes.len(),
        action: WriteAction::Wrote,
    })
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    std::path::PathBuf::from(os)
}

fn write_temp_then_rename(
    path: &Path,
    tmp_path: &Path,
    bytes: &[u8],
) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(tmp_path, path)?;
    if let Some(parent) = path.parent() {
        if let Ok(dir) = std::fs::File::open(parent) {
            let _ = dir.sync_all();
        }
    }
    Ok(())
}
