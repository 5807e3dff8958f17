/// Ports module defining interfaces for hexagonal architecture
///
/// Outbound ports (driven ports) are the interfaces the export use case
/// relies on to reach the inventory API, the filesystem and the console.
pub mod outbound;
