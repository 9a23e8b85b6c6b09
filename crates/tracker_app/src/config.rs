use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracker_engine::DEFAULT_PROGRESS_FILE;
use tracker_logging::{tracker_info, tracker_warn, LogDestination};

/// Where log output goes; `Off` installs no logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogTarget {
    Off,
    File,
    Terminal,
    Both,
}

impl LogTarget {
    fn destination(self) -> Option<LogDestination> {
        match self {
            LogTarget::Off => None,
            LogTarget::File => Some(LogDestination::File),
            LogTarget::Terminal => Some(LogDestination::Terminal),
            LogTarget::Both => Some(LogDestination::Both),
        }
    }
}

/// Session settings, optionally read from a RON file. Omitted fields keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub progress_file: PathBuf,
    pub log_target: LogTarget,
    pub log_level: String,
    pub log_file: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            progress_file: PathBuf::from(DEFAULT_PROGRESS_FILE),
            log_target: LogTarget::Terminal,
            log_level: "info".to_string(),
            log_file: PathBuf::from("tracker.log"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl TrackerConfig {
    pub fn with_progress_file(path: impl Into<PathBuf>) -> Self {
        Self {
            progress_file: path.into(),
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Like [`TrackerConfig::load`], but a missing or broken file yields defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                tracker_info!("Loaded config from {:?}", path);
                config
            }
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => {
                tracker_warn!("{}; using defaults", err);
                Self::default()
            }
        }
    }
}

/// Installs the global logger described by `config`.
pub fn init_logging(config: &TrackerConfig) {
    if let Some(destination) = config.log_target.destination() {
        tracker_logging::initialize(
            destination,
            tracker_logging::parse_level(&config.log_level),
            &config.log_file,
        );
    }
}
