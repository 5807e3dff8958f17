use container_inventory_export::prelude::*;
use std::sync::{Arc, Mutex};

/// Severity of a captured line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

/// Mock ProgressReporter that records every line it is given.
///
/// Clones share the same buffer, so a test can keep one handle while the
/// use case owns another.
#[derive(Default, Clone)]
pub struct MockProgressReporter {
    lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl MockProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: Level, line: String) {
        self.lines.lock().unwrap().push((level, line));
    }

    /// Every captured line, in order
    pub fn get_messages(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Lines reported through `report_error`
    pub fn errors(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == Level::Error)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.push(Level::Info, message.to_string());
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        self.push(
            Level::Info,
            format!("[{}/{}] {}", current, total, message.unwrap_or_default()),
        );
    }

    fn report_error(&self, message: &str) {
        self.push(Level::Error, message.to_string());
    }

    fn report_completion(&self, message: &str) {
        self.push(Level::Info, message.to_string());
    }
}
