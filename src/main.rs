use chrono::Utc;
use container_inventory_export::adapters::outbound::console::LogProgressReporter;
use container_inventory_export::adapters::outbound::filesystem::FileSystemArtifactStore;
use container_inventory_export::adapters::outbound::network::{
    ClientSettings, ContainerApiClient, TokenChain,
};
use container_inventory_export::application::dto::{ExportRequest, ExportSummary};
use container_inventory_export::application::use_cases::ExportWeeklyReportsUseCase;
use container_inventory_export::cli::Args;
use container_inventory_export::config::{self, Settings};
use container_inventory_export::logging;
use container_inventory_export::shared::error::ExitCode;
use container_inventory_export::shared::Result;
use std::process;
use uuid::Uuid;

fn main() {
    match run() {
        Ok(summary) => {
            if !summary.is_complete() {
                log::warn!(
                    "[!] {} window(s) failed and will be retried on the next run",
                    summary.failed.len()
                );
            }
        }
        Err(e) => {
            let exit_code = ExitCode::from_error(&e);

            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            log::error!("Run failed: {}", e);
            eprintln!();
            process::exit(exit_code.as_i32());
        }
    }
}

fn run() -> Result<ExportSummary> {
    // Parse command-line arguments
    let args = Args::parse_args();
    let today = Utc::now().date_naive();

    // Resolve settings (CLI > environment > config file > defaults)
    let cwd = std::env::current_dir()?;
    let config_file = config::load_for_args(&args, &cwd)?;
    let settings = Settings::resolve(&args, config_file, today, |key| std::env::var(key).ok())?;

    // Prepare directories and logging
    config::ensure_directories(&settings)?;
    let log_path = logging::init(&settings.log_dir, settings.verbose)?;

    let run_id = Uuid::new_v4();
    log::info!("Run {} started, logging to {}", run_id, log_path.display());
    log::debug!("Endpoint: {}", settings.endpoint);

    // Create adapters (Dependency Injection)
    let tokens = TokenChain::new(&settings.primary_token, settings.fallback_token.as_deref());
    let inventory_repository = ContainerApiClient::new(
        ClientSettings {
            endpoint: settings.endpoint.clone(),
            page_limit: settings.page_limit,
            timeout: settings.timeout,
            request_delay: settings.request_delay,
            accept_invalid_certs: settings.accept_invalid_certs,
        },
        tokens,
    )?;
    let artifact_store = FileSystemArtifactStore::new(settings.output.clone());
    let progress_reporter = LogProgressReporter::new();

    // Create use case with injected dependencies
    let use_case =
        ExportWeeklyReportsUseCase::new(inventory_repository, artifact_store, progress_reporter);

    let request = ExportRequest::new(
        settings.date_range,
        today,
        settings.optional_filter.clone(),
        settings.columns.clone(),
        settings.abort_on_fetch_error,
    );

    // Execute use case
    let summary = use_case.execute(request)?;

    log::info!(
        "Run {} finished: {} container(s), {} CSV row(s) across {} new weekly report(s)",
        run_id,
        summary.total_containers(),
        summary.total_rows(),
        summary.exported.len()
    );

    Ok(summary)
}
