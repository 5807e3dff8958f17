//! Run logging: every line goes to stderr and to a per-run log file.

use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::shared::error::ExportError;
use crate::shared::Result;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `weekly_report_<YYYYMMDD_HHMM>.log` inside `log_dir`
pub fn log_file_path(log_dir: &Path, started_at: DateTime<Local>) -> PathBuf {
    log_dir.join(format!(
        "weekly_report_{}.log",
        started_at.format("%Y%m%d_%H%M")
    ))
}

/// Duplicates every write to the log file and stderr.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        io::stderr().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        io::stderr().flush()
    }
}

/// Level used when `RUST_LOG` is not set
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Builder reading its filter from `env`, with the run log line format.
fn logger_builder(env: env_logger::Env<'_>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_env(env);
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} - {} - {}",
            Local::now().format(TIMESTAMP_FORMAT),
            record.level(),
            record.args()
        )
    });
    builder
}

/// Installs the global logger.
///
/// The level defaults to `info` (`debug` with `verbose`); `RUST_LOG` still
/// applies per module. Returns the path of the log file in use.
///
/// # Errors
/// Returns `ExportError::FileWriteError` when the log file cannot be opened.
pub fn init(log_dir: &Path, verbose: bool) -> Result<PathBuf> {
    let path = log_file_path(log_dir, Local::now());
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| ExportError::FileWriteError {
            path: path.clone(),
            details: format!("Failed to open log file: {}", e),
        })?;

    let mut builder =
        logger_builder(env_logger::Env::default().default_filter_or(default_filter(verbose)));
    builder.target(env_logger::Target::Pipe(Box::new(TeeWriter { file })));
    // A second init in the same process (tests) keeps the first logger
    let _ = builder.try_init();

    Ok(path)
}
