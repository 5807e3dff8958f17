use super::date_window::DateWindow;
use std::fmt;

/// The `filter` query parameter sent to the inventory endpoint for one window.
///
/// The window is expressed as a `created` range in epoch milliseconds; an
/// optional user filter is appended verbatim and never validated locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery(String);

impl FilterQuery {
    pub fn for_window(window: &DateWindow, user_filter: Option<&str>) -> Self {
        let created = format!(
            "created:[{} ... {}]",
            window.start_epoch_millis(),
            window.end_epoch_millis_inclusive()
        );
        match user_filter.map(str::trim).filter(|f| !f.is_empty()) {
            Some(extra) => Self(format!("{} and {}", created, extra)),
            None => Self(created),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window() -> DateWindow {
        DateWindow::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 8).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_window_only() {
        let query = FilterQuery::for_window(&window(), None);
        assert_eq!(
            query.as_str(),
            "created:[1735689600000 ... 1736294399999]"
        );
    }

    #[test]
    fn test_with_user_filter() {
        let query = FilterQuery::for_window(&window(), Some(" state:RUNNING "));
        assert_eq!(
            query.to_string(),
            "created:[1735689600000 ... 1736294399999] and state:RUNNING"
        );
    }

    #[test]
    fn test_blank_user_filter_is_ignored() {
        let query = FilterQuery::for_window(&window(), Some("   "));
        assert_eq!(query, FilterQuery::for_window(&window(), None));
    }
}
