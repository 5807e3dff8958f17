/// Filesystem adapters for artifact persistence
mod artifact_store;

pub use artifact_store::{FileSystemArtifactStore, OutputLayout};
