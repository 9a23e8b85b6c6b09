use crate::filter::{self, ViewSlice};
use crate::view_model::{self, AppViewModel};
use crate::{aggregate, Aggregate, Catalog, CatalogItem, Filter, Notice, ProgressState, Selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    NoCatalog,
    CatalogLoaded,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    catalog: Catalog,
    filename: Option<String>,
    filter: Filter,
    completed: ProgressState,
    notices: Vec<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        view_model::build(self)
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    /// The active catalog, if one has been loaded.
    pub fn catalog(&self) -> Option<&Catalog> {
        match self.session {
            SessionState::NoCatalog => None,
            SessionState::CatalogLoaded => Some(&self.catalog),
        }
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn completed(&self) -> &ProgressState {
        &self.completed
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Current view slice; empty when no catalog is loaded.
    pub fn view_slice(&self) -> ViewSlice<'_> {
        filter::apply(&self.catalog, &self.filter)
    }

    /// Aggregation over an arbitrary slice against the current completion state.
    pub fn aggregate_slice<'a, I>(&self, items: I) -> Aggregate
    where
        I: IntoIterator<Item = &'a CatalogItem>,
    {
        aggregate(items, &self.completed)
    }

    /// Aggregation over the whole catalog, ignoring filters.
    pub fn overall(&self) -> Aggregate {
        aggregate(self.catalog.items(), &self.completed)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether a re-render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn restore_progress(&mut self, completed: ProgressState) {
        self.completed = completed;
        self.mark_dirty();
    }

    pub(crate) fn install_catalog(&mut self, filename: String, catalog: Catalog) {
        self.catalog = catalog;
        self.filename = Some(filename);
        self.filter = Filter::default();
        self.session = SessionState::CatalogLoaded;
        self.mark_dirty();
    }

    pub(crate) fn select_subject(&mut self, subject: Selector) {
        let subject = match subject {
            Selector::Only(value) if !self.catalog.items().iter().any(|i| i.subject == value) => {
                Selector::All
            }
            other => other,
        };
        let topic_still_valid = match &self.filter.topic {
            Selector::All => true,
            Selector::Only(topic) => filter::topic_options(&self.catalog, &subject).contains(topic),
        };
        if !topic_still_valid {
            self.filter.topic = Selector::All;
            self.mark_dirty();
        }
        if self.filter.subject != subject {
            self.filter.subject = subject;
            self.mark_dirty();
        }
    }

    pub(crate) fn select_topic(&mut self, topic: Selector) {
        let topic = match topic {
            Selector::Only(value)
                if !filter::topic_options(&self.catalog, &self.filter.subject).contains(&value) =>
            {
                Selector::All
            }
            other => other,
        };
        if self.filter.topic != topic {
            self.filter.topic = topic;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_query(&mut self, query: String) {
        if self.filter.query != query {
            self.filter.query = query;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_completion(&mut self, url: &str, complete: bool) {
        if self.completed.set(url, complete) {
            self.mark_dirty();
        }
    }

    pub(crate) fn clear_completion(&mut self) {
        self.completed.clear();
        self.mark_dirty();
    }

    pub(crate) fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
        self.mark_dirty();
    }

    pub(crate) fn clear_notices(&mut self) {
        if !self.notices.is_empty() {
            self.notices.clear();
            self.mark_dirty();
        }
    }
}
