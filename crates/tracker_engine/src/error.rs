use std::fmt::Display;

use thiserror::Error;
use tracker_core::UploadFailure;

use crate::SourceFormat;

/// Why an uploaded file could not become a catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("unsupported file type: {filename}")]
    UnsupportedFormat { filename: String },
    #[error("failed to parse {format} file: {message}")]
    Parse {
        format: SourceFormat,
        message: String,
    },
}

impl UploadError {
    pub(crate) fn parse(format: SourceFormat, message: impl Display) -> Self {
        UploadError::Parse {
            format,
            message: message.to_string(),
        }
    }

    /// Core-side classification used for user notices.
    pub fn failure(&self) -> UploadFailure {
        match self {
            UploadError::UnsupportedFormat { .. } => UploadFailure::UnsupportedFormat,
            UploadError::Parse { message, .. } => UploadFailure::Parse(message.clone()),
        }
    }
}
