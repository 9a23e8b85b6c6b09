use crate::{CatalogItem, ProgressState};

/// Completion summary for a slice of catalog items.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aggregate {
    pub done: usize,
    pub total: usize,
    /// `done / total`, or 0.0 for an empty slice.
    pub pct: f64,
}

impl Aggregate {
    /// Whole percent, rounded down.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        // Integer arithmetic avoids 0.29 * 100 = 28.999..
        ((self.done * 100) / self.total) as u32
    }

    /// `"done/total"` label shown next to progress bars.
    pub fn label(&self) -> String {
        format!("{}/{}", self.done, self.total)
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.done == self.total
    }
}

/// Counts completed items. The same function serves every granularity:
/// the whole catalog, a subject, or a (subject, topic) group.
pub fn aggregate<'a, I>(items: I, completed: &ProgressState) -> Aggregate
where
    I: IntoIterator<Item = &'a CatalogItem>,
{
    let (done, total) = items.into_iter().fold((0usize, 0usize), |(done, total), item| {
        let done = done + usize::from(completed.is_complete(&item.url));
        (done, total + 1)
    });
    let pct = if total > 0 {
        done as f64 / total as f64
    } else {
        0.0
    };
    Aggregate { done, total, pct }
}
