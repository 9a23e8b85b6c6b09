use std::collections::BTreeSet;
use std::sync::Arc;

/// Display title used for items whose title cell was empty.
pub const UNTITLED_PLACEHOLDER: &str = "Content";

/// One trackable row of an uploaded curriculum file.
///
/// All fields are trimmed. `url` is never empty and is the identity key used
/// by [`crate::ProgressState`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CatalogItem {
    pub subject: String,
    pub topic: String,
    pub title: String,
    pub url: String,
    pub grade_url: String,
    pub topic_url: String,
}

impl CatalogItem {
    pub fn new(
        subject: impl Into<String>,
        topic: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            topic: topic.into(),
            title: title.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED_PLACEHOLDER
        } else {
            &self.title
        }
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            subject: self.subject.clone(),
            topic: self.topic.clone(),
        }
    }
}

/// (subject, topic) bucket used for display and aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GroupKey {
    pub subject: String,
    pub topic: String,
}

/// Structural UI identity of a rendered row.
///
/// `occurrence` counts earlier rows with the same url inside the same group,
/// so duplicate rows still get distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub group: GroupKey,
    pub url: String,
    pub occurrence: usize,
}

/// Immutable, ordered catalog from one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    items: Arc<[CatalogItem]>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sorted, de-duplicated subject names.
    pub fn subjects(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| item.subject.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(ToOwned::to_owned)
            .collect()
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.items.iter().any(|item| item.url == url)
    }

    /// Cheap handle comparison; two loads of the same cached upload share storage.
    pub fn shares_storage_with(&self, other: &Catalog) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl FromIterator<CatalogItem> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_falls_back_to_placeholder() {
        let item = CatalogItem::new("Math", "Algebra", "", "u1");
        assert_eq!(item.display_title(), UNTITLED_PLACEHOLDER);
        let item = CatalogItem::new("Math", "Algebra", "Lesson 1", "u1");
        assert_eq!(item.display_title(), "Lesson 1");
    }

    #[test]
    fn subjects_are_sorted_and_unique() {
        let catalog: Catalog = vec![
            CatalogItem::new("Sci", "Bio", "", "u1"),
            CatalogItem::new("Math", "Algebra", "", "u2"),
            CatalogItem::new("Sci", "Chem", "", "u3"),
        ]
        .into_iter()
        .collect();
        assert_eq!(catalog.subjects(), vec!["Math".to_string(), "Sci".to_string()]);
    }
}
