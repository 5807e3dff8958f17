/// Mock implementations for testing
mod mock_inventory_repository;
mod mock_progress_reporter;

pub use mock_inventory_repository::MockInventoryRepository;
pub use mock_progress_reporter::MockProgressReporter;
