use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory {path:?} unusable: {reason}")]
    OutputDir { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl PersistError {
    fn output_dir(path: &Path, reason: impl ToString) -> Self {
        PersistError::OutputDir {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Ensure output directory exists; create if missing. An existing directory is reused.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::output_dir(dir, e))?;
        if !meta.is_dir() {
            return Err(PersistError::output_dir(dir, "path is not a directory"));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::output_dir(dir, e))?;
    }
    Ok(())
}

/// `0001.png` style name: 1-based, zero-padded to four digits, extension taken from `page_ref`.
pub fn page_filename(index: usize, page_ref: &str) -> String {
    match Path::new(page_ref).extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{:04}.{ext}", index + 1),
        None => format!("{:04}", index + 1),
    }
}

/// Write one page with plain create/overwrite semantics.
pub fn write_page(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistError> {
    let target = dir.join(filename);
    fs::write(&target, bytes)?;
    Ok(target)
}
