use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Validates that a path is not a symbolic link
///
/// Missing paths are accepted: the caller is about to create them.
///
/// # Security
/// This function uses `symlink_metadata()` instead of `metadata()` to ensure
/// we check the symlink itself, not the target it points to.
///
/// # Arguments
/// * `path` - The path to validate
/// * `operation` - Description of the operation (e.g., "read", "write") for error messages
///
/// # Errors
/// Returns an error if the path is a symbolic link or if metadata cannot be read
pub fn validate_not_symlink(path: &Path, operation: &str) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => anyhow::bail!(
            "Failed to read metadata for {} operation on {}: {}",
            operation,
            path.display(),
            e
        ),
    };

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, {} operations on symbolic links are not allowed.",
            path.display(),
            operation
        );
    }

    Ok(())
}

/// Validates that a directory exists and is a real directory (not a symlink to one)
pub fn validate_directory(path: &Path, description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read {} directory {}: {}",
            description,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} directory {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            description,
            path.display()
        );
    }

    if !metadata.is_dir() {
        anyhow::bail!("{} is not a directory", path.display());
    }

    Ok(())
}
