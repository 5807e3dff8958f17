/// Use cases module containing application business logic orchestration
mod export_weekly_reports;

pub use export_weekly_reports::ExportWeeklyReportsUseCase;
