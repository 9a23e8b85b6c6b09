use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracker_core::ProgressState;
use tracker_logging::{tracker_error, tracker_info, tracker_warn};

use crate::{AtomicFileWriter, PersistError};

/// Default location of the progress file, relative to the working directory.
pub const DEFAULT_PROGRESS_FILE: &str = "progress.json";

#[derive(Debug, Deserialize)]
struct PersistedProgress {
    #[serde(default)]
    completed_urls: Vec<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Serialize)]
struct PersistedProgressRef<'a> {
    completed_urls: Vec<&'a str>,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

/// Durable url -> completed mapping backed by one JSON file.
///
/// Every mutation rewrites the whole file atomically. Single writer only:
/// sharing the file between sessions would need an external lock.
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    state: ProgressState,
    /// Top-level keys other than `completed_urls`, written back unchanged.
    extra: Map<String, Value>,
}

impl ProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: ProgressState::new(),
            extra: Map::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    /// Reads the progress file. Missing or unreadable files yield empty state.
    pub fn load(&mut self) -> &ProgressState {
        let (state, extra) = match read_progress(&self.path) {
            Some(persisted) => (
                ProgressState::from_urls(persisted.completed_urls),
                persisted.extra,
            ),
            None => (ProgressState::new(), Map::new()),
        };
        self.state = state;
        self.extra = extra;
        &self.state
    }

    /// Marks `url` complete or incomplete and rewrites the file.
    pub fn toggle(&mut self, url: &str, complete: bool) -> Result<(), PersistError> {
        self.state.set(url, complete);
        self.save()
    }

    /// Clears all completions and rewrites the file.
    pub fn reset(&mut self) -> Result<(), PersistError> {
        self.state.clear();
        self.save()
    }

    pub fn save(&self) -> Result<(), PersistError> {
        let persisted = PersistedProgressRef {
            completed_urls: self.state.urls().collect(),
            extra: &self.extra,
        };
        let content = serde_json::to_string_pretty(&persisted)
            .map_err(|err| PersistError::Serialize(err.to_string()))?;

        let writer = AtomicFileWriter::new(self.path.clone());
        if let Err(err) = writer.write(&content) {
            tracker_error!("Failed to write progress to {:?}: {}", self.path, err);
            return Err(err);
        }
        Ok(())
    }
}

fn read_progress(path: &Path) -> Option<PersistedProgress> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracker_info!("No progress file at {:?}; starting empty", path);
            return None;
        }
        Err(err) => {
            tracker_warn!("Failed to read progress from {:?}: {}", path, err);
            return None;
        }
    };

    match serde_json::from_str::<PersistedProgress>(&content) {
        Ok(persisted) => {
            tracker_info!(
                "Loaded {} completed item(s) from {:?}",
                persisted.completed_urls.len(),
                path
            );
            Some(persisted)
        }
        Err(err) => {
            tracker_warn!("Failed to parse progress from {:?}: {}", path, err);
            None
        }
    }
}
