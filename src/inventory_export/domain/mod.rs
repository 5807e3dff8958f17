pub mod column;
pub mod date_window;
pub mod filter_query;
pub mod flat_row;
pub mod inventory_record;

pub use column::{Column, ColumnKind, ColumnSet, FieldPath, VulnerabilityField};
pub use date_window::{parse_calendar_date, DateWindow};
pub use filter_query::FilterQuery;
pub use flat_row::{FlatRow, FlatTable};
pub use inventory_record::InventoryRecord;
