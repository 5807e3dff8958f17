use crate::inventory_export::domain::DateWindow;
use crate::shared::error::ExportError;
use crate::shared::Result;
use chrono::{Days, NaiveDate};

/// Width of a regular export window
pub const WINDOW_WIDTH_DAYS: u64 = 7;

/// Length of the default look-back when no start date is given
pub const DEFAULT_LOOKBACK_WEEKS: u64 = 52;

/// A validated `[start, end)` span to be covered by weekly windows.
///
/// The plan is restartable: every call to [`WindowPlan::windows`] starts a
/// fresh lazy iteration from `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlan {
    start: NaiveDate,
    end: NaiveDate,
}

impl WindowPlan {
    /// Creates a plan. `start == end` is a valid, empty plan.
    ///
    /// # Errors
    /// Returns `ExportError::InvalidDateRange` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ExportError::invalid_date_range(format!(
                "start date {} is after end date {}",
                start, end
            ))
            .into());
        }
        Ok(Self { start, end })
    }

    /// The default span ending at `today`: the last 52 weeks
    pub fn default_ending(today: NaiveDate) -> Result<Self> {
        let start = lookback_start(today)?;
        Self::new(start, today)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Widens the plan so it begins no later than `earlier`.
    pub fn extend_start_to(self, earlier: NaiveDate) -> Self {
        Self {
            start: self.start.min(earlier),
            end: self.end,
        }
    }

    pub fn windows(&self) -> WeeklyWindows {
        WeeklyWindows {
            cursor: self.start,
            end: self.end,
        }
    }

    /// Number of windows the plan yields
    pub fn window_count(&self) -> usize {
        let days = (self.end - self.start).num_days() as u64;
        days.div_ceil(WINDOW_WIDTH_DAYS) as usize
    }
}

impl IntoIterator for &WindowPlan {
    type Item = DateWindow;
    type IntoIter = WeeklyWindows;

    fn into_iter(self) -> Self::IntoIter {
        self.windows()
    }
}

/// `today - 52 weeks`
pub fn lookback_start(today: NaiveDate) -> Result<NaiveDate> {
    today
        .checked_sub_days(Days::new(DEFAULT_LOOKBACK_WEEKS * WINDOW_WIDTH_DAYS))
        .ok_or_else(|| {
            ExportError::invalid_date_range(format!(
                "cannot look back {} weeks from {}",
                DEFAULT_LOOKBACK_WEEKS, today
            ))
            .into()
        })
}

/// Lazy ascending sequence of contiguous weekly windows; the final one may be shorter.
#[derive(Debug, Clone)]
pub struct WeeklyWindows {
    cursor: NaiveDate,
    end: NaiveDate,
}

impl Iterator for WeeklyWindows {
    type Item = DateWindow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }
        let next = self
            .cursor
            .checked_add_days(Days::new(WINDOW_WIDTH_DAYS))
            .map_or(self.end, |d| d.min(self.end));
        let window = DateWindow::new(self.cursor, next).ok()?;
        self.cursor = next;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = WindowPlan {
            start: self.cursor.min(self.end),
            end: self.end,
        }
        .window_count();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WeeklyWindows {}
