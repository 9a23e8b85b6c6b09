//! Tracker core: pure catalog model, progress aggregation, filtering and the
//! session state machine.
mod aggregate;
mod catalog;
mod effect;
mod filter;
mod msg;
mod notice;
mod progress;
mod state;
mod update;
mod view_model;

pub use aggregate::{aggregate, Aggregate};
pub use catalog::{Catalog, CatalogItem, GroupKey, ItemKey, UNTITLED_PLACEHOLDER};
pub use effect::Effect;
pub use filter::{apply, subject_options, topic_options, Filter, Group, Selector, ViewSlice};
pub use msg::{Msg, UploadFailure};
pub use notice::Notice;
pub use progress::ProgressState;
pub use state::{AppState, SessionState};
pub use update::update;
pub use view_model::{AppViewModel, GroupView, ItemRowView, SubjectSummary};
