use std::fmt;
use std::path::Path;

use crate::UploadError;

/// Upload formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    pub fn from_filename(filename: &str) -> Result<Self, UploadError> {
        let extension = Path::new(filename.trim())
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(SourceFormat::Csv),
            Some("xlsx") => Ok(SourceFormat::Xlsx),
            _ => Err(UploadError::UnsupportedFormat {
                filename: filename.to_string(),
            }),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Csv => write!(f, "CSV"),
            SourceFormat::Xlsx => write!(f, "XLSX"),
        }
    }
}
