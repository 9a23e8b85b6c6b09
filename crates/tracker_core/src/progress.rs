use std::collections::BTreeSet;

/// Set of completed identity keys.
///
/// Independent of any catalog: urls the current catalog does not contain stay
/// stored and count again once a later catalog reintroduces them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressState {
    completed: BTreeSet<String>,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            completed: urls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_complete(&self, url: &str) -> bool {
        self.completed.contains(url)
    }

    /// Marks `url` complete or incomplete. Returns whether membership changed.
    pub fn set(&mut self, url: &str, complete: bool) -> bool {
        if complete {
            if self.completed.contains(url) {
                false
            } else {
                self.completed.insert(url.to_owned())
            }
        } else {
            self.completed.remove(url)
        }
    }

    pub fn clear(&mut self) {
        self.completed.clear();
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Completed urls in sorted order.
    pub fn urls(&self) -> impl Iterator<Item = &str> + '_ {
        self.completed.iter().map(String::as_str)
    }
}
