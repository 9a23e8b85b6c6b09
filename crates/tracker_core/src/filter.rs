use std::collections::{BTreeMap, BTreeSet};

use crate::{Catalog, CatalogItem, GroupKey};

/// Subject or topic selection: everything, or one exact (trimmed) value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selector {
    #[default]
    All,
    Only(String),
}

impl Selector {
    /// `None` selects everything. `Some("")` selects rows whose value is empty.
    pub fn from_option(value: Option<&str>) -> Self {
        match value {
            Some(v) => Selector::Only(v.trim().to_owned()),
            None => Selector::All,
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(expected) => expected == value,
        }
    }

    pub fn as_option(&self) -> Option<&str> {
        match self {
            Selector::All => None,
            Selector::Only(value) => Some(value),
        }
    }
}

/// Filter parameters, composed subject -> topic -> text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter {
    pub subject: Selector,
    pub topic: Selector,
    pub query: String,
}

impl Filter {
    /// Lowercased search needle, or `None` when the query is blank.
    fn needle(&self) -> Option<String> {
        let trimmed = self.query.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }
}

/// Filtered, borrowed projection of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewSlice<'a> {
    items: Vec<&'a CatalogItem>,
}

/// One (subject, topic) bucket of a [`ViewSlice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<'a> {
    pub key: GroupKey,
    pub items: Vec<&'a CatalogItem>,
}

impl<'a> ViewSlice<'a> {
    pub fn items(&self) -> &[&'a CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a CatalogItem> + '_ {
        self.items.iter().copied()
    }

    /// Groups ordered by key; items keep catalog order inside each group.
    pub fn groups(&self) -> Vec<Group<'a>> {
        let mut buckets: BTreeMap<GroupKey, Vec<&'a CatalogItem>> = BTreeMap::new();
        for item in self.items.iter().copied() {
            buckets.entry(item.group_key()).or_default().push(item);
        }
        buckets
            .into_iter()
            .map(|(key, items)| Group { key, items })
            .collect()
    }

    /// Items of one subject, in catalog order.
    pub fn subject_items(&self, subject: &str) -> impl Iterator<Item = &'a CatalogItem> + '_ {
        let subject = subject.to_owned();
        self.iter().filter(move |item| item.subject == subject)
    }
}

/// Applies subject, topic and text filters in that order.
pub fn apply<'a>(catalog: &'a Catalog, filter: &Filter) -> ViewSlice<'a> {
    let needle = filter.needle();
    let items = catalog
        .items()
        .iter()
        .filter(|item| filter.subject.matches(&item.subject))
        .filter(|item| filter.topic.matches(&item.topic))
        .filter(|item| match &needle {
            Some(needle) => matches_text(item, needle),
            None => true,
        })
        .collect();
    ViewSlice { items }
}

/// Sorted subjects available for selection.
pub fn subject_options(catalog: &Catalog) -> Vec<String> {
    catalog.subjects()
}

/// Sorted topics present after the subject filter only.
pub fn topic_options(catalog: &Catalog, subject: &Selector) -> Vec<String> {
    catalog
        .items()
        .iter()
        .filter(|item| subject.matches(&item.subject))
        .map(|item| item.topic.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(ToOwned::to_owned)
        .collect()
}

fn matches_text(item: &CatalogItem, needle: &str) -> bool {
    item.title.to_lowercase().contains(needle) || item.url.to_lowercase().contains(needle)
}
