use crate::adapters::outbound::formatters::{CsvFormatter, JsonFormatter};
use crate::inventory_export::domain::{DateWindow, FlatTable, InventoryRecord};
use crate::ports::outbound::{ArtifactStore, SavedArtifact};
use crate::shared::error::ExportError;
use crate::shared::security::{validate_directory, validate_not_symlink};
use crate::shared::Result;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

/// Directories used by an export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub json_dir: PathBuf,
    pub csv_dir: PathBuf,
    /// Staging area for files being written
    pub temp_dir: PathBuf,
}

impl OutputLayout {
    pub fn json_path(&self, window: &DateWindow) -> PathBuf {
        self.json_dir.join(format!("{}.json", window.artifact_stem()))
    }

    pub fn csv_path(&self, window: &DateWindow) -> PathBuf {
        self.csv_dir.join(format!("{}.csv", window.artifact_stem()))
    }

    /// Creates every directory in the layout
    pub fn create_all(&self) -> Result<()> {
        for dir in [&self.json_dir, &self.csv_dir, &self.temp_dir] {
            fs::create_dir_all(dir).map_err(|e| ExportError::FileWriteError {
                path: dir.clone(),
                details: format!("Failed to create directory: {}", e),
            })?;
        }
        Ok(())
    }
}

/// FileSystemArtifactStore adapter for the weekly JSON/CSV artifacts
///
/// Files are staged in the temp directory and moved into place only once
/// complete. The CSV goes first so that a visible JSON artifact always
/// implies its CSV (if any) is complete.
pub struct FileSystemArtifactStore {
    layout: OutputLayout,
    json_formatter: JsonFormatter,
    csv_formatter: CsvFormatter,
}

impl FileSystemArtifactStore {
    pub fn new(layout: OutputLayout) -> Self {
        Self {
            layout,
            json_formatter: JsonFormatter::new(),
            csv_formatter: CsvFormatter::new(),
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Removes staging files left for `window` by an interrupted run.
    ///
    /// A killed process never drops its `NamedTempFile`, so partial
    /// `<stem>.json.<random>.tmp` files would otherwise pile up. Files
    /// belonging to other windows are left alone.
    fn discard_stale_staging(&self, window: &DateWindow) {
        let entries = match fs::read_dir(&self.layout.temp_dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };

        let stem = window.artifact_stem();
        let prefixes = [format!("{}.json.", stem), format!("{}.csv.", stem)];
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let is_stale = name.ends_with(".tmp")
                && prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()));
            if !is_stale {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => log::debug!("Removed stale staging file {}", entry.path().display()),
                Err(e) => log::warn!(
                    "[!] Could not remove stale staging file {}: {}",
                    entry.path().display(),
                    e
                ),
            }
        }
    }

    /// Writes `content` to `destination` via a staged temp file.
    fn write_staged(&self, destination: &Path, content: &str) -> Result<()> {
        let to_write_error = |details: String| ExportError::FileWriteError {
            path: destination.to_path_buf(),
            details,
        };

        validate_directory(&self.layout.temp_dir, "temp")
            .map_err(|e| to_write_error(e.to_string()))?;
        validate_not_symlink(destination, "write").map_err(|e| to_write_error(e.to_string()))?;

        let file_name = destination
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("artifact");

        let mut staged = Builder::new()
            .prefix(&format!("{}.", file_name))
            .suffix(".tmp")
            .tempfile_in(&self.layout.temp_dir)
            .map_err(|e| to_write_error(format!("Failed to create temp file: {}", e)))?;

        staged
            .write_all(content.as_bytes())
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|e| to_write_error(format!("Failed to write temp file: {}", e)))?;

        move_into_place(staged, destination).map_err(|e| to_write_error(e.to_string()))?;
        Ok(())
    }
}

/// Renames the staged file into place. When the staging directory lives on
/// another filesystem the rename fails, so the file is copied next to the
/// destination first and renamed from there.
fn move_into_place(staged: NamedTempFile, destination: &Path) -> io::Result<()> {
    let staged = match staged.persist(destination) {
        Ok(_) => return Ok(()),
        Err(e) => {
            log::debug!(
                "Direct rename to {} failed ({}); copying across filesystems",
                destination.display(),
                e.error
            );
            e.file
        }
    };

    let parent = destination.parent().unwrap_or_else(|| Path::new("."));
    let sibling = Builder::new()
        .prefix(".staging-")
        .suffix(".tmp")
        .tempfile_in(parent)?;
    fs::copy(staged.path(), sibling.path())?;
    sibling.as_file().sync_all()?;
    sibling.persist(destination).map_err(|e| e.error)?;
    Ok(())
}

impl ArtifactStore for FileSystemArtifactStore {
    fn existing_windows(&self) -> Result<Vec<DateWindow>> {
        let entries = match fs::read_dir(&self.layout.json_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ExportError::FileReadError {
                    path: self.layout.json_dir.clone(),
                    details: e.to_string(),
                }
                .into())
            }
        };

        let mut windows = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ExportError::FileReadError {
                path: self.layout.json_dir.clone(),
                details: e.to_string(),
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(DateWindow::from_artifact_stem)
            {
                Some(window) => windows.push(window),
                None => log::debug!("Ignoring unrecognized file {}", path.display()),
            }
        }
        windows.sort();
        Ok(windows)
    }

    fn save(
        &self,
        window: &DateWindow,
        records: &[InventoryRecord],
        table: &FlatTable,
    ) -> Result<SavedArtifact> {
        self.discard_stale_staging(window);

        let csv_path = if table.is_empty() {
            log::info!(
                "[i] No data for this week, skipping CSV: {}",
                self.layout
                    .csv_path(window)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            );
            None
        } else {
            let path = self.layout.csv_path(window);
            let content = self.csv_formatter.format(table)?;
            self.write_staged(&path, &content)?;
            log::info!(
                "[+] CSV report generated: {}  (rows written: {})",
                path.display(),
                table.len()
            );
            Some(path)
        };

        let json_path = self.layout.json_path(window);
        let content = self.json_formatter.format(records)?;
        self.write_staged(&json_path, &content)?;
        log::info!("Moved JSON to final directory: {}", json_path.display());

        Ok(SavedArtifact {
            json_path,
            csv_path,
        })
    }
}
