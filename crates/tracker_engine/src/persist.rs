use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("directory {path:?} missing or not writable: {message}")]
    Directory { path: PathBuf, message: String },
    #[error("failed to serialize progress: {0}")]
    Serialize(String),
    #[error("failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Ensure the directory that will hold `target` exists; create if missing.
pub fn ensure_parent_dir(target: &Path) -> Result<PathBuf, PersistError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let dir_error = |message: String| PersistError::Directory {
        path: dir.clone(),
        message,
    };
    if dir.exists() {
        let meta = fs::metadata(&dir).map_err(|e| dir_error(e.to_string()))?;
        if !meta.is_dir() {
            return Err(dir_error("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(&dir).map_err(|e| dir_error(e.to_string()))?;
    }
    Ok(dir)
}

/// Atomically replaces one file by writing a sibling temp file then renaming.
pub struct AtomicFileWriter {
    target: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(target: PathBuf) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn write(&self, content: &str) -> Result<(), PersistError> {
        let dir = ensure_parent_dir(&self.target)?;
        let write_error = |source: io::Error| PersistError::Write {
            path: self.target.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&dir).map_err(write_error)?;
        tmp.write_all(content.as_bytes()).map_err(write_error)?;
        tmp.flush().map_err(write_error)?;
        tmp.as_file_mut().sync_all().map_err(write_error)?;

        // Rename over the target; readers see either the old or the new file.
        tmp.persist(&self.target)
            .map_err(|e| write_error(e.error))?;
        Ok(())
    }
}
