use crate::application::dto::{
    DateRangeSelection, ExportRequest, ExportSummary, WindowExport, WindowFailure,
};
use crate::inventory_export::domain::{DateWindow, FilterQuery};
use crate::inventory_export::services::{FetchHistory, RecordFlattener, WindowPlan};
use crate::ports::outbound::{ArtifactStore, InventoryRepository, ProgressReporter};
use crate::shared::error::ExportError;
use crate::shared::Result;

/// ExportWeeklyReportsUseCase - Core use case for the weekly inventory export
///
/// Walks the requested span one week at a time, skips weeks that already
/// have an artifact, and fetches, flattens and writes the rest. Windows are
/// processed strictly in order; each one is complete before the next starts.
///
/// # Type Parameters
/// * `IR` - InventoryRepository implementation
/// * `AS` - ArtifactStore implementation
/// * `PR` - ProgressReporter implementation
pub struct ExportWeeklyReportsUseCase<IR, AS, PR> {
    inventory_repository: IR,
    artifact_store: AS,
    progress_reporter: PR,
}

impl<IR, AS, PR> ExportWeeklyReportsUseCase<IR, AS, PR>
where
    IR: InventoryRepository,
    AS: ArtifactStore,
    PR: ProgressReporter,
{
    /// Creates a new ExportWeeklyReportsUseCase with injected dependencies
    pub fn new(inventory_repository: IR, artifact_store: AS, progress_reporter: PR) -> Self {
        Self {
            inventory_repository,
            artifact_store,
            progress_reporter,
        }
    }

    /// Executes the export
    ///
    /// # Errors
    /// - `ExportError::InvalidDateRange` before any fetch when the range is inverted
    /// - `ExportError::Authentication` as soon as credentials are definitively rejected
    /// - any artifact write failure
    /// - the first `ExportError::Fetch` when `abort_on_fetch_error` is set
    pub fn execute(&self, request: ExportRequest) -> Result<ExportSummary> {
        // Step 1: Re-derive what has already been fetched
        let mut history = self.load_history()?;

        // Step 2: Decide the span to cover
        let plan = self.plan_windows(&request, &history)?;
        self.report_run_parameters(&request, &plan);

        // Step 3: Export every window that has no artifact yet
        let flattener = RecordFlattener::new(request.columns.clone());
        let total = plan.window_count();
        let mut summary = ExportSummary::new(plan.start(), plan.end());

        for (index, window) in plan.windows().enumerate() {
            if history.is_fetched(&window) {
                self.progress_reporter.report(&format!(
                    "Skipping existing report {}.json",
                    window.artifact_stem()
                ));
                summary.skipped.push(window);
                continue;
            }

            self.progress_reporter.report_progress(
                index + 1,
                total,
                Some(&format!("Fetching data for {}", window)),
            );

            match self.export_window(window, &request, &flattener) {
                Ok(export) => {
                    history.record(window);
                    summary.exported.push(export);
                }
                Err(e) if is_window_failure(&e) => {
                    self.progress_reporter
                        .report_error(&format!("[ERROR] {}", e));
                    if request.abort_on_fetch_error {
                        return Err(e.context(format!(
                            "Aborting run after fetch failure for window {}",
                            window
                        )));
                    }
                    summary.failed.push(WindowFailure {
                        window,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        // Step 4: Summarize
        self.report_summary(&summary);
        Ok(summary)
    }

    fn load_history(&self) -> Result<FetchHistory> {
        let existing = self.artifact_store.existing_windows()?;
        let history = FetchHistory::from_windows(existing);
        if !history.is_empty() {
            self.progress_reporter.report(&format!(
                "📂 Found {} existing weekly report(s)",
                history.len()
            ));
        }
        Ok(history)
    }

    fn plan_windows(&self, request: &ExportRequest, history: &FetchHistory) -> Result<WindowPlan> {
        match request.date_range {
            DateRangeSelection::Explicit { start, end } => {
                let plan = WindowPlan::new(start, end)?;
                self.progress_reporter.report(&format!(
                    "[*] Using provided date range: {} → {}",
                    start, end
                ));
                Ok(plan)
            }
            DateRangeSelection::Default => {
                let mut plan = WindowPlan::default_ending(request.today)?;
                // Keep older artifacts inside the managed span so week boundaries stay aligned
                if let Some(earliest) = history.earliest_start() {
                    plan = plan.extend_start_to(earliest);
                }
                self.progress_reporter.report(&format!(
                    "[*] Using default workflow (last ~52 weeks): {} → {}",
                    plan.start(),
                    plan.end()
                ));
                Ok(plan)
            }
        }
    }

    fn report_run_parameters(&self, request: &ExportRequest, plan: &WindowPlan) {
        if let Some(filter) = request.optional_filter.as_deref() {
            self.progress_reporter
                .report(&format!("Using optional filter: {}", filter));
        }

        let unsupported = request.columns.unsupported_names();
        if !unsupported.is_empty() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: unsupported CSV column(s) will be left blank: {}",
                unsupported.join(", ")
            ));
        }

        if plan.window_count() == 0 {
            self.progress_reporter
                .report("No weekly windows fall inside the selected range.");
        }
    }

    fn export_window(
        &self,
        window: DateWindow,
        request: &ExportRequest,
        flattener: &RecordFlattener,
    ) -> Result<WindowExport> {
        let filter = FilterQuery::for_window(&window, request.optional_filter.as_deref());
        self.progress_reporter.report(&format!(
            "[+] Fetching data for {}.json, filter: {}",
            window.artifact_stem(),
            filter
        ));

        let records = self.inventory_repository.fetch_window(window, filter)?;
        let table = flattener.flatten(&records);
        let artifact = self.artifact_store.save(&window, &records, &table)?;

        self.progress_reporter.report(&format!(
            "Week {}: {} containers processed.",
            window,
            records.len()
        ));

        Ok(WindowExport {
            window,
            containers: records.len(),
            rows: table.len(),
            artifact,
        })
    }

    fn report_summary(&self, summary: &ExportSummary) {
        self.progress_reporter.report(&format!(
            "Windows exported: {}, skipped: {}, failed: {}",
            summary.exported.len(),
            summary.skipped.len(),
            summary.failed.len()
        ));
        for failure in &summary.failed {
            self.progress_reporter.report_error(&format!(
                "   - {} was not exported and will be retried on the next run",
                failure.window
            ));
        }
        self.progress_reporter.report_completion(&format!(
            "Total number of containers found in this run: {}",
            summary.total_containers()
        ));
    }
}

/// Fetch failures are isolated to their window; everything else ends the run.
fn is_window_failure(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<ExportError>(),
        Some(e) if !e.is_fatal()
    )
}
