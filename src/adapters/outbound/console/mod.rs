/// Console adapters for run progress
mod log_reporter;

pub use log_reporter::LogProgressReporter;
