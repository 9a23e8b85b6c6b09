/// User-visible, non-fatal message held by the session until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    UnsupportedFormat { filename: String },
    ParseFailed { filename: String, message: String },
    EmptyCatalog { filename: String },
    PersistFailed { message: String },
    ProgressReset,
}

impl Notice {
    pub fn is_warning(&self) -> bool {
        !matches!(self, Notice::ProgressReset)
    }

    pub fn message(&self) -> String {
        match self {
            Notice::UnsupportedFormat { filename } => {
                format!("{filename}: unsupported file type, upload a .csv or .xlsx file")
            }
            Notice::ParseFailed { filename, message } => {
                format!("{filename}: could not be read ({message})")
            }
            Notice::EmptyCatalog { filename } => {
                format!("{filename}: no rows with an item URL, check the file contents")
            }
            Notice::PersistFailed { message } => {
                format!("progress could not be saved and may be lost on restart: {message}")
            }
            Notice::ProgressReset => "progress was reset".to_string(),
        }
    }
}
