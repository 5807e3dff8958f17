pub mod fetch_history;
pub mod record_flattener;
pub mod window_generator;

pub use fetch_history::FetchHistory;
pub use record_flattener::RecordFlattener;
pub use window_generator::{WeeklyWindows, WindowPlan};
