//! container-inventory-export - Weekly export of the container security inventory
//!
//! This library fetches the container inventory from a paginated HTTP API
//! one calendar week at a time and writes one JSON artifact (plus a flattened
//! CSV when the week has data) per week. Weeks that already have a JSON
//! artifact are never fetched again, so runs are incremental and resumable.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`inventory_export`): Date windows, inventory records,
//!   CSV columns and the pure services that plan, track and flatten
//! - **Application Layer** (`application`): The export use case and its DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use container_inventory_export::prelude::*;
//! use std::path::PathBuf;
//! use std::time::Duration;
//!
//! # fn main() -> Result<()> {
//! // Create adapters
//! let settings = ClientSettings {
//!     endpoint: ContainerApiClient::endpoint_for_gateway("https://gateway.qg2.apps.qualys.com")?,
//!     page_limit: ContainerApiClient::DEFAULT_PAGE_LIMIT,
//!     timeout: Duration::from_secs(60),
//!     request_delay: Duration::from_millis(200),
//!     accept_invalid_certs: false,
//! };
//! let tokens = TokenChain::new(&std::env::var("QUALYS_TOKEN")?, None);
//! let inventory_repository = ContainerApiClient::new(settings, tokens)?;
//! let artifact_store = FileSystemArtifactStore::new(OutputLayout {
//!     json_dir: PathBuf::from("weekly_reports"),
//!     csv_dir: PathBuf::from("weekly_csv_reports"),
//!     temp_dir: PathBuf::from("temp_reports"),
//! });
//! let progress_reporter = LogProgressReporter::new();
//!
//! // Create use case
//! let use_case =
//!     ExportWeeklyReportsUseCase::new(inventory_repository, artifact_store, progress_reporter);
//!
//! // Execute
//! let request = ExportRequest::new(
//!     DateRangeSelection::Default,
//!     chrono::Utc::now().date_naive(),
//!     None,
//!     ColumnSet::default(),
//!     false,
//! );
//! let summary = use_case.execute(request)?;
//! println!("{} containers exported", summary.total_containers());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod inventory_export;
pub mod logging;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::LogProgressReporter;
    pub use crate::adapters::outbound::filesystem::{FileSystemArtifactStore, OutputLayout};
    pub use crate::adapters::outbound::formatters::{CsvFormatter, JsonFormatter};
    pub use crate::adapters::outbound::network::{
        BearerToken, ClientSettings, ContainerApiClient, TokenChain,
    };
    pub use crate::application::dto::{
        DateRangeSelection, ExportRequest, ExportSummary, WindowExport, WindowFailure,
    };
    pub use crate::application::use_cases::ExportWeeklyReportsUseCase;
    pub use crate::inventory_export::domain::{
        Column, ColumnSet, DateWindow, FilterQuery, FlatRow, FlatTable, InventoryRecord,
    };
    pub use crate::inventory_export::services::{
        FetchHistory, RecordFlattener, WeeklyWindows, WindowPlan,
    };
    pub use crate::ports::outbound::{
        ArtifactStore, InventoryPage, InventoryRepository, PageCursor, PageLocation,
        ProgressReporter, SavedArtifact,
    };
    pub use crate::shared::error::{ExitCode, ExportError};
    pub use crate::shared::Result;
}
