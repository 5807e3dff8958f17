use crate::ports::outbound::ProgressReporter;

/// LogProgressReporter adapter forwarding run progress to the `log` facade
///
/// Whatever logger `main` installs decides where the lines end up (the run
/// log file and stderr).
pub struct LogProgressReporter;

impl LogProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for LogProgressReporter {
    fn report(&self, message: &str) {
        log::info!("{}", message);
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        match message {
            Some(msg) => log::info!("[{}/{}] {}", current, total, msg),
            None => log::info!("[{}/{}]", current, total),
        }
    }

    fn report_error(&self, message: &str) {
        log::error!("{}", message);
    }

    fn report_completion(&self, message: &str) {
        log::info!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_without_logger_does_not_panic() {
        let reporter = LogProgressReporter::new();
        reporter.report("Test message");
        reporter.report_progress(5, 10, Some("test"));
        reporter.report_progress(6, 10, None);
        reporter.report_error("Test error");
        reporter.report_completion("Test completion");
    }
}
