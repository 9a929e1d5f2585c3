//! Local filesystem primitives shared by the file-backed stores.
//!
//! Every store file is replaced whole: the new contents go to a sibling
//! `*.tmp` file which is synced and then renamed over the target, so a
//! crash mid-write leaves either the old file or the new one.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Sibling temporary path for an atomic replace (`python.json` -> `python.json.tmp`).
pub fn temp_path(path: &Path) -> PathBuf {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => path.with_extension(format!("{ext}.tmp")),
        None => path.with_extension("tmp"),
    }
}

/// Ensure parent directory exists.
fn ensure_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write bytes atomically (write to temp, sync, then rename).
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_dir(path)?;

    let tmp = temp_path(path);
    let written = (|| -> Result<()> {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, path)?;
        Ok(())
    })();

    if written.is_err() {
        // Best effort cleanup
        let _ = fs::remove_file(&tmp);
    }
    written
}

/// Read bytes, returning None if file doesn't exist.
pub fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::Io(e)),
    }
}
