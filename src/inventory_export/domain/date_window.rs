use crate::shared::error::ExportError;
use crate::shared::Result;
use chrono::{NaiveDate, NaiveTime};
use std::fmt;

/// Date format accepted on the command line and used in artifact names
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Separator between the start and end date in an artifact file stem
const ARTIFACT_STEM_SEPARATOR: char = '_';

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
/// Returns `ExportError::InvalidDateRange` when the value is not a valid date.
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        ExportError::invalid_date_range(format!(
            "'{}' is not a valid YYYY-MM-DD date ({})",
            value, e
        ))
        .into()
    })
}

/// A half-open `[start, end)` range of calendar dates.
///
/// The unit of fetching and exporting: one window produces one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Creates a window, rejecting empty or inverted ranges.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(ExportError::invalid_date_range(format!(
                "window start {} must be before window end {}",
                start, end
            ))
            .into());
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end date
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// File stem shared by the JSON and CSV artifacts of this window,
    /// e.g. `2025-01-06_2025-01-13`.
    pub fn artifact_stem(&self) -> String {
        format!(
            "{}{}{}",
            self.start.format(DATE_FORMAT),
            ARTIFACT_STEM_SEPARATOR,
            self.end.format(DATE_FORMAT)
        )
    }

    /// Inverse of [`DateWindow::artifact_stem`]. Returns `None` for names
    /// that were not produced by this tool.
    pub fn from_artifact_stem(stem: &str) -> Option<Self> {
        let (start, end) = stem.split_once(ARTIFACT_STEM_SEPARATOR)?;
        let start = NaiveDate::parse_from_str(start, DATE_FORMAT).ok()?;
        let end = NaiveDate::parse_from_str(end, DATE_FORMAT).ok()?;
        Self::new(start, end).ok()
    }

    /// Epoch milliseconds of UTC midnight on the start date
    pub fn start_epoch_millis(&self) -> i64 {
        self.start.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
    }

    /// Epoch milliseconds of the last instant before UTC midnight on the end date
    pub fn end_epoch_millis_inclusive(&self) -> i64 {
        self.end.and_time(NaiveTime::MIN).and_utc().timestamp_millis() - 1
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_and_empty_ranges() {
        assert!(DateWindow::new(date(2025, 1, 8), date(2025, 1, 1)).is_err());
        assert!(DateWindow::new(date(2025, 1, 1), date(2025, 1, 1)).is_err());
        assert!(DateWindow::new(date(2025, 1, 1), date(2025, 1, 2)).is_ok());
    }

    #[test]
    fn test_artifact_stem_round_trip() {
        let window = DateWindow::new(date(2024, 12, 30), date(2025, 1, 6)).unwrap();
        assert_eq!(window.artifact_stem(), "2024-12-30_2025-01-06");
        assert_eq!(
            DateWindow::from_artifact_stem("2024-12-30_2025-01-06"),
            Some(window)
        );
    }

    #[test]
    fn test_from_artifact_stem_rejects_foreign_names() {
        assert_eq!(DateWindow::from_artifact_stem("Jan06-Jan13"), None);
        assert_eq!(DateWindow::from_artifact_stem("2025-01-13_2025-01-06"), None);
        assert_eq!(DateWindow::from_artifact_stem("2025-01-06"), None);
        assert_eq!(DateWindow::from_artifact_stem("notes_2025-01-06"), None);
    }

    #[test]
    fn test_epoch_bounds() {
        let window = DateWindow::new(date(2025, 1, 1), date(2025, 1, 8)).unwrap();
        // 2025-01-01T00:00:00Z
        assert_eq!(window.start_epoch_millis(), 1_735_689_600_000);
        // 2025-01-07T23:59:59.999Z
        assert_eq!(window.end_epoch_millis_inclusive(), 1_736_294_399_999);
    }

    #[test]
    fn test_display() {
        let window = DateWindow::new(date(2025, 1, 1), date(2025, 1, 4)).unwrap();
        assert_eq!(window.to_string(), "2025-01-01..2025-01-04");
    }

    #[test]
    fn test_parse_calendar_date() {
        assert_eq!(parse_calendar_date("2025-02-28").unwrap(), date(2025, 2, 28));
        assert_eq!(parse_calendar_date(" 2025-02-28 ").unwrap(), date(2025, 2, 28));

        let err = parse_calendar_date("2025-02-30").unwrap_err();
        assert!(err.downcast_ref::<ExportError>().is_some());
        assert!(parse_calendar_date("02/28/2025").is_err());
    }
}
