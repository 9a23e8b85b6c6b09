use crate::{AppState, Effect, Msg, Notice, SessionState, UploadFailure};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ProgressRestored(completed) => {
            state.restore_progress(completed);
            Vec::new()
        }
        Msg::CatalogUploaded { filename, bytes } => {
            vec![Effect::ParseCatalog { filename, bytes }]
        }
        Msg::CatalogLoaded { filename, catalog } => {
            if catalog.is_empty() {
                // Soft failure: keep whatever catalog was active before.
                state.push_notice(Notice::EmptyCatalog { filename });
            } else {
                state.install_catalog(filename, catalog);
            }
            Vec::new()
        }
        Msg::UploadRejected { filename, failure } => {
            let notice = match failure {
                UploadFailure::UnsupportedFormat => Notice::UnsupportedFormat { filename },
                UploadFailure::Parse(message) => Notice::ParseFailed { filename, message },
            };
            state.push_notice(notice);
            Vec::new()
        }
        Msg::SubjectSelected(subject) => {
            if state.session() == SessionState::CatalogLoaded {
                state.select_subject(subject);
            }
            Vec::new()
        }
        Msg::TopicSelected(topic) => {
            if state.session() == SessionState::CatalogLoaded {
                state.select_topic(topic);
            }
            Vec::new()
        }
        Msg::QueryChanged(query) => {
            if state.session() == SessionState::CatalogLoaded {
                state.set_query(query);
            }
            Vec::new()
        }
        Msg::ItemToggled { url, complete } => {
            if url.is_empty() {
                return (state, Vec::new());
            }
            state.set_completion(&url, complete);
            vec![Effect::PersistCompletion { url, complete }]
        }
        Msg::ResetClicked => {
            state.clear_completion();
            state.push_notice(Notice::ProgressReset);
            vec![Effect::ResetProgress]
        }
        Msg::PersistFailed { message } => {
            state.push_notice(Notice::PersistFailed { message });
            Vec::new()
        }
        Msg::NoticesDismissed => {
            state.clear_notices();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
