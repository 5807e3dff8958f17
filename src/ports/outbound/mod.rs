/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (inventory API, file system, logging).
pub mod artifact_store;
pub mod inventory_repository;
pub mod progress_reporter;

pub use artifact_store::{ArtifactStore, SavedArtifact};
pub use inventory_repository::{
    InventoryPage, InventoryPages, InventoryRepository, PageCursor, PageLocation,
};
pub use progress_reporter::ProgressReporter;
