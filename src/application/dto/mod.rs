/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod export_request;
mod export_summary;

pub use export_request::{DateRangeSelection, ExportRequest};
pub use export_summary::{ExportSummary, WindowExport, WindowFailure};
