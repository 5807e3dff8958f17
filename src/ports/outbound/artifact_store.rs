use crate::inventory_export::domain::{DateWindow, FlatTable, InventoryRecord};
use crate::shared::Result;
use std::path::PathBuf;

/// Where the files for one exported window ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub json_path: PathBuf,
    /// `None` when the window produced no rows
    pub csv_path: Option<PathBuf>,
}

/// ArtifactStore port for persisting weekly artifacts
///
/// The presence of a window's JSON artifact is what marks the window as
/// fetched, so implementations must never expose a partially written JSON file.
pub trait ArtifactStore {
    /// Lists the windows that already have a JSON artifact
    ///
    /// # Errors
    /// Returns an error if the artifact location exists but cannot be read
    fn existing_windows(&self) -> Result<Vec<DateWindow>>;

    /// Persists the artifact for one window
    ///
    /// The JSON file is always written (an empty list for an empty window);
    /// the CSV file only when `table` has rows.
    ///
    /// # Errors
    /// Returns an error if serialization or any file operation fails
    fn save(
        &self,
        window: &DateWindow,
        records: &[InventoryRecord],
        table: &FlatTable,
    ) -> Result<SavedArtifact>;
}
