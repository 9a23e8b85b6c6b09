use std::collections::{BTreeSet, HashMap};

use crate::filter::{self, Filter};
use crate::{Aggregate, AppState, GroupKey, ItemKey, Notice, SessionState};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub filename: Option<String>,
    /// Progress over the whole catalog, independent of filters.
    pub overall: Aggregate,
    pub filter: Filter,
    pub subject_options: Vec<String>,
    /// Topics of the currently selected subject only.
    pub topic_options: Vec<String>,
    pub subjects: Vec<SubjectSummary>,
    pub groups: Vec<GroupView>,
    pub visible_count: usize,
    pub notices: Vec<Notice>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectSummary {
    pub subject: String,
    pub aggregate: Aggregate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupView {
    pub key: GroupKey,
    pub aggregate: Aggregate,
    pub items: Vec<ItemRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRowView {
    pub key: ItemKey,
    /// 1-based position inside the group.
    pub ordinal: usize,
    pub title: String,
    pub url: String,
    pub completed: bool,
}

pub(crate) fn build(state: &AppState) -> AppViewModel {
    let mut view = AppViewModel {
        session: state.session(),
        filename: state.filename().map(ToOwned::to_owned),
        filter: state.filter().clone(),
        notices: state.notices().to_vec(),
        dirty: state.is_dirty(),
        ..AppViewModel::default()
    };
    let Some(catalog) = state.catalog() else {
        return view;
    };

    view.overall = state.overall();
    view.subject_options = filter::subject_options(catalog);
    view.topic_options = filter::topic_options(catalog, &state.filter().subject);

    let slice = state.view_slice();
    view.visible_count = slice.len();
    view.subjects = slice
        .iter()
        .map(|item| item.subject.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|subject| {
            let aggregate = state.aggregate_slice(slice.subject_items(&subject));
            SubjectSummary { subject, aggregate }
        })
        .collect();

    let completed = state.completed();
    view.groups = slice
        .groups()
        .into_iter()
        .map(|group| {
            let aggregate = state.aggregate_slice(group.items.iter().copied());
            let mut seen: HashMap<&str, usize> = HashMap::new();
            let items = group
                .items
                .iter()
                .copied()
                .enumerate()
                .map(|(index, item)| {
                    let occurrence = seen.entry(item.url.as_str()).or_insert(0);
                    let key = ItemKey {
                        group: group.key.clone(),
                        url: item.url.clone(),
                        occurrence: *occurrence,
                    };
                    *occurrence += 1;
                    ItemRowView {
                        key,
                        ordinal: index + 1,
                        title: item.display_title().to_owned(),
                        url: item.url.clone(),
                        completed: completed.is_complete(&item.url),
                    }
                })
                .collect();
            GroupView {
                key: group.key,
                aggregate,
                items,
            }
        })
        .collect();

    view
}
