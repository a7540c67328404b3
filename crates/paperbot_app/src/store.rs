use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("directory missing or not writable: {0}")]
    Dir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure `dir` exists; create it if missing.
pub fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StoreError::Dir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StoreError::Dir("path is not a directory".into()));
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| StoreError::Dir(e.to_string()))?;
    Ok(())
}

/// Atomically write `content` to `{dir}/{filename}` via temp file + rename.
pub fn write_atomic(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf, StoreError> {
    ensure_dir(dir)?;

    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    // Duplicate names overwrite the earlier file.
    if target.exists() {
        fs::remove_file(&target)?;
    }
    tmp.persist(&target).map_err(|e| StoreError::Io(e.error))?;
    Ok(target)
}
