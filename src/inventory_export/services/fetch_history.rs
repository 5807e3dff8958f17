use crate::inventory_export::domain::DateWindow;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Windows that already have a JSON artifact.
///
/// Built once per run from what is on disk and appended to as windows are
/// exported; nothing survives the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchHistory {
    completed: BTreeSet<DateWindow>,
}

impl FetchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_windows<I>(windows: I) -> Self
    where
        I: IntoIterator<Item = DateWindow>,
    {
        Self {
            completed: windows.into_iter().collect(),
        }
    }

    pub fn is_fetched(&self, window: &DateWindow) -> bool {
        self.completed.contains(window)
    }

    /// Records a freshly exported window. Returns `false` if it was already known.
    pub fn record(&mut self, window: DateWindow) -> bool {
        self.completed.insert(window)
    }

    /// Start date of the oldest known artifact
    pub fn earliest_start(&self) -> Option<NaiveDate> {
        self.completed.iter().map(DateWindow::start).min()
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}
