use crate::inventory_export::domain::ColumnSet;
use chrono::NaiveDate;

/// Which span of dates the run should cover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeSelection {
    /// The last 52 weeks, widened back to the oldest artifact already on disk
    Default,
    /// Exactly `[start, end)`
    Explicit { start: NaiveDate, end: NaiveDate },
}

/// ExportRequest - Internal request DTO for the weekly export use case
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub date_range: DateRangeSelection,
    /// Reference date for the default range
    pub today: NaiveDate,
    /// Extra API filter combined with each window's date filter
    pub optional_filter: Option<String>,
    /// CSV columns, in output order
    pub columns: ColumnSet,
    /// Stop the whole run at the first per-window fetch failure
    pub abort_on_fetch_error: bool,
}

impl ExportRequest {
    pub fn new(
        date_range: DateRangeSelection,
        today: NaiveDate,
        optional_filter: Option<String>,
        columns: ColumnSet,
        abort_on_fetch_error: bool,
    ) -> Self {
        Self {
            date_range,
            today,
            optional_filter,
            columns,
            abort_on_fetch_error,
        }
    }
}
