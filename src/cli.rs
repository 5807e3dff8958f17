use clap::Parser;
use std::path::PathBuf;

/// Export the container security inventory as weekly JSON and CSV reports
#[derive(Parser, Debug, Default)]
#[command(name = "container-inventory-export")]
#[command(version)]
#[command(
    about = "Export the container security inventory as weekly JSON and CSV reports",
    long_about = "Fetches the container inventory one week at a time and writes one JSON \
                  file (and, when the week has data, one CSV file) per week. Weeks that \
                  already have a JSON report are skipped, so the tool can run repeatedly \
                  and only fetch what is missing.\n\n\
                  Credentials are read from QUALYS_TOKEN and, optionally, \
                  QUALYS_FALLBACK_TOKEN."
)]
pub struct Args {
    /// API gateway URL, e.g. https://gateway.qg1.apps.qualys.com
    #[arg(value_name = "BASE_URL")]
    pub base_url: Option<String>,

    /// First day to export (YYYY-MM-DD)
    #[arg(long = "start_date", value_name = "DATE")]
    pub start_date: Option<String>,

    /// Day the export stops at, exclusive (YYYY-MM-DD)
    #[arg(long = "end_date", value_name = "DATE")]
    pub end_date: Option<String>,

    /// Extra API filter combined with each week's date filter
    #[arg(long = "optional_filter", value_name = "QQL")]
    pub optional_filter: Option<String>,

    /// Comma-separated list of CSV columns
    #[arg(long = "csv_columns", value_name = "COLUMNS")]
    pub csv_columns: Option<String>,

    /// Read the gateway URL from QUALYS_BASE_URL instead of BASE_URL
    #[arg(long = "base_url_env")]
    pub base_url_env: bool,

    /// Path to a configuration file (defaults to ./container-export.config.yml if present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Stop the whole run at the first week that fails to fetch
    #[arg(long = "abort_on_fetch_error")]
    pub abort_on_fetch_error: bool,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
