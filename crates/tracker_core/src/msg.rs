use crate::{Catalog, ProgressState, Selector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Completion state loaded from durable storage at session start.
    ProgressRestored(ProgressState),
    /// User uploaded a file; the bytes still need parsing.
    CatalogUploaded { filename: String, bytes: Vec<u8> },
    /// Parser produced a catalog (possibly empty) for an upload.
    CatalogLoaded { filename: String, catalog: Catalog },
    /// Parser rejected an upload.
    UploadRejected {
        filename: String,
        failure: UploadFailure,
    },
    /// User picked a subject.
    SubjectSelected(Selector),
    /// User picked a topic.
    TopicSelected(Selector),
    /// User edited the search box.
    QueryChanged(String),
    /// User ticked or cleared a completion checkbox.
    ItemToggled { url: String, complete: bool },
    /// User clicked reset progress.
    ResetClicked,
    /// Writing completion state to disk failed.
    PersistFailed { message: String },
    /// User acknowledged the current notices.
    NoticesDismissed,
    /// Carries no change; a front end may send it for inputs it ignores.
    NoOp,
}

/// Why an upload produced no catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFailure {
    UnsupportedFormat,
    Parse(String),
}
