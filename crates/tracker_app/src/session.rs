use std::collections::VecDeque;

use tracker_core::{
    update, Aggregate, AppState, AppViewModel, Catalog, CatalogItem, Msg, Selector,
};
use tracker_engine::{PersistError, ProgressStore, UploadError};

use crate::effects::parsed_msg;
use crate::{EffectOutcome, EffectRunner, TrackerConfig};

/// One learner session: the state machine plus the effect runner.
///
/// Every action runs to completion, effects included, before it returns.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    /// Opens the progress store named by `config` and restores its state.
    pub fn open(config: &TrackerConfig) -> Self {
        Self::with_store(ProgressStore::new(config.progress_file.clone()))
    }

    pub fn with_store(mut store: ProgressStore) -> Self {
        let restored = store.load().clone();
        let mut session = Self {
            state: AppState::new(),
            runner: EffectRunner::new(store),
        };
        session.dispatch(Msg::ProgressRestored(restored));
        session
    }

    /// Feeds one message through `update`, running effects and their
    /// follow-up messages until the queue drains.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<EffectOutcome> {
        let mut outcomes = Vec::new();
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            for effect in effects {
                let outcome = self.runner.run(effect);
                inbox.extend(outcome.follow_up());
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Parses and installs a new catalog. An empty result is returned as
    /// `Ok` and leaves the previous catalog active with a warning notice.
    pub fn upload_catalog(&mut self, bytes: &[u8], filename: &str) -> Result<Catalog, UploadError> {
        let result = self.runner.parse(bytes, filename);
        self.dispatch(parsed_msg(filename, &result));
        result
    }

    /// Applies subject, topic and query in that order; `None` means all.
    pub fn set_filter(
        &mut self,
        subject: Option<&str>,
        topic: Option<&str>,
        query: Option<&str>,
    ) -> AppViewModel {
        self.dispatch(Msg::SubjectSelected(Selector::from_option(subject)));
        self.dispatch(Msg::TopicSelected(Selector::from_option(topic)));
        self.dispatch(Msg::QueryChanged(query.unwrap_or_default().to_string()));
        self.state.view()
    }

    /// Marks `url` complete or incomplete and persists immediately. On a
    /// failed write the in-memory state still changes and a notice is raised.
    pub fn toggle_item(&mut self, url: &str, complete: bool) -> Result<(), PersistError> {
        let outcomes = self.dispatch(Msg::ItemToggled {
            url: url.to_string(),
            complete,
        });
        first_persist_error(outcomes)
    }

    pub fn reset_progress(&mut self) -> Result<(), PersistError> {
        let outcomes = self.dispatch(Msg::ResetClicked);
        first_persist_error(outcomes)
    }

    pub fn dismiss_notices(&mut self) {
        self.dispatch(Msg::NoticesDismissed);
    }

    pub fn aggregate<'a, I>(&self, items: I) -> Aggregate
    where
        I: IntoIterator<Item = &'a CatalogItem>,
    {
        self.state.aggregate_slice(items)
    }

    pub fn overall(&self) -> Aggregate {
        self.state.overall()
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.state.catalog()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &ProgressStore {
        self.runner.store()
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// View model if anything changed since the last call.
    pub fn take_render(&mut self) -> Option<AppViewModel> {
        let view = self.state.view();
        self.state.consume_dirty().then_some(view)
    }
}

fn first_persist_error(outcomes: Vec<EffectOutcome>) -> Result<(), PersistError> {
    match outcomes
        .into_iter()
        .find_map(EffectOutcome::into_persist_error)
    {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
