use crate::inventory_export::domain::DateWindow;
use crate::ports::outbound::SavedArtifact;
use chrono::NaiveDate;

/// A window that was fetched and written during this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowExport {
    pub window: DateWindow,
    pub containers: usize,
    pub rows: usize,
    pub artifact: SavedArtifact,
}

/// A window whose fetch failed; it has no artifact and is retried next run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowFailure {
    pub window: DateWindow,
    pub reason: String,
}

/// ExportSummary - Internal response DTO from the weekly export use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub exported: Vec<WindowExport>,
    pub skipped: Vec<DateWindow>,
    pub failed: Vec<WindowFailure>,
}

impl ExportSummary {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            exported: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn total_containers(&self) -> usize {
        self.exported.iter().map(|w| w.containers).sum()
    }

    pub fn total_rows(&self) -> usize {
        self.exported.iter().map(|w| w.rows).sum()
    }

    /// True when no window failed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
