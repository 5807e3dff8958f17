//! Configuration support for container-inventory-export.
//!
//! Provides YAML-based configuration through `container-export.config.yml`
//! files and merges it with command-line arguments and environment variables
//! into the [`Settings`] of a run. Precedence is CLI, then environment, then
//! config file, then built-in defaults.

use anyhow::Context;
use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::adapters::outbound::filesystem::OutputLayout;
use crate::adapters::outbound::network::ContainerApiClient;
use crate::application::dto::DateRangeSelection;
use crate::cli::Args;
use crate::inventory_export::domain::{parse_calendar_date, ColumnSet};
use crate::inventory_export::services::window_generator::lookback_start;
use crate::shared::error::ExportError;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "container-export.config.yml";

pub const TOKEN_ENV: &str = "QUALYS_TOKEN";
pub const FALLBACK_TOKEN_ENV: &str = "QUALYS_FALLBACK_TOKEN";
pub const BASE_URL_ENV: &str = "QUALYS_BASE_URL";

const DEFAULT_JSON_DIR: &str = "weekly_reports";
const DEFAULT_CSV_DIR: &str = "weekly_csv_reports";
const DEFAULT_TEMP_DIR: &str = "temp_reports";
const DEFAULT_LOG_DIR: &str = "logs";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub gateway_url: Option<String>,
    pub optional_filter: Option<String>,
    pub csv_columns: Option<Vec<String>>,
    pub page_limit: Option<u32>,
    pub request_delay_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub abort_on_fetch_error: Option<bool>,
    pub accept_invalid_certs: Option<bool>,
    pub output: Option<OutputConfig>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Output directory overrides.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    pub json_dir: Option<PathBuf>,
    pub csv_dir: Option<PathBuf>,
    pub temp_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ExportError::configuration(
            format!("Failed to read config file: {} ({})", path.display(), e),
            "Check that the file exists and is readable.",
        )
    })?;

    // Keep the parser message in the `Caused by:` chain
    let config: ConfigFile = serde_yaml_ng::from_str(&content).map_err(|e| {
        anyhow::Error::new(e).context(ExportError::configuration(
            format!("Failed to parse config file: {}", path.display()),
            "Ensure the file contains valid YAML syntax.",
        ))
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Loads the config named on the command line, or the one in `cwd` if any.
pub fn load_for_args(args: &Args, cwd: &Path) -> Result<ConfigFile> {
    match &args.config {
        Some(path) => load_config_from_path(path),
        None => Ok(discover_config(cwd)?.unwrap_or_default()),
    }
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.page_limit == Some(0) {
        return Err(ExportError::configuration(
            "Invalid config: page_limit must be greater than 0.",
            "Remove page_limit to use the default of 250.",
        )
        .into());
    }

    if let Some(ref columns) = config.csv_columns {
        if columns.iter().all(|c| c.trim().is_empty()) {
            return Err(ExportError::configuration(
                "Invalid config: csv_columns must name at least one column.",
                "Remove csv_columns to export every supported column.",
            )
            .into());
        }
    }

    if let Some(ref gateway) = config.gateway_url {
        if gateway.trim().is_empty() {
            return Err(ExportError::configuration(
                "Invalid config: gateway_url must not be empty.",
                "Set gateway_url to e.g. https://gateway.qg2.apps.qualys.com or remove it.",
            )
            .into());
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
    if let Some(ref output) = config.output {
        for key in output.unknown_fields.keys() {
            eprintln!(
                "⚠️  Warning: Unknown config field 'output.{}' will be ignored.",
                key
            );
        }
    }
}

/// Everything a run needs, fully resolved
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: Url,
    pub primary_token: String,
    pub fallback_token: Option<String>,
    pub date_range: DateRangeSelection,
    pub optional_filter: Option<String>,
    pub columns: ColumnSet,
    pub page_limit: u32,
    pub timeout: Duration,
    pub request_delay: Duration,
    pub abort_on_fetch_error: bool,
    pub accept_invalid_certs: bool,
    pub output: OutputLayout,
    pub log_dir: PathBuf,
    pub verbose: bool,
}

impl Settings {
    /// Merges CLI arguments, environment and config file.
    ///
    /// `env` looks up an environment variable; blank values count as unset.
    ///
    /// # Errors
    /// - `ExportError::Configuration` for a missing token or gateway, or a bad gateway URL
    /// - `ExportError::InvalidDateRange` for unparseable dates
    pub fn resolve<F>(args: &Args, config: ConfigFile, today: NaiveDate, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let primary_token = env(TOKEN_ENV).ok_or_else(|| {
            ExportError::configuration(
                format!("Missing {}.", TOKEN_ENV),
                format!("Export it first: export {}='<your_api_token_here>'", TOKEN_ENV),
            )
        })?;
        let fallback_token = env(FALLBACK_TOKEN_ENV);

        let gateway = resolve_gateway(args, config.gateway_url.as_deref(), &env)?;
        let endpoint = ContainerApiClient::endpoint_for_gateway(&gateway)?;

        let date_range = resolve_date_range(
            args.start_date.as_deref(),
            args.end_date.as_deref(),
            today,
        )?;

        let optional_filter = args
            .optional_filter
            .as_deref()
            .or(config.optional_filter.as_deref())
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        let columns = args
            .csv_columns
            .as_deref()
            .and_then(ColumnSet::parse_list)
            .or_else(|| {
                config
                    .csv_columns
                    .as_ref()
                    .and_then(|list| ColumnSet::parse_list(&list.join(",")))
            })
            .unwrap_or_default();

        let output = config.output.unwrap_or_default();
        let layout = OutputLayout {
            json_dir: output
                .json_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_JSON_DIR)),
            csv_dir: output
                .csv_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_DIR)),
            temp_dir: output
                .temp_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMP_DIR)),
        };

        Ok(Self {
            endpoint,
            primary_token,
            fallback_token,
            date_range,
            optional_filter,
            columns,
            page_limit: config
                .page_limit
                .unwrap_or(ContainerApiClient::DEFAULT_PAGE_LIMIT),
            timeout: Duration::from_secs(
                config
                    .timeout_secs
                    .unwrap_or(ContainerApiClient::DEFAULT_TIMEOUT_SECONDS),
            ),
            request_delay: Duration::from_millis(
                config
                    .request_delay_ms
                    .unwrap_or(ContainerApiClient::DEFAULT_REQUEST_DELAY_MS),
            ),
            abort_on_fetch_error: args.abort_on_fetch_error
                || config.abort_on_fetch_error.unwrap_or(false),
            accept_invalid_certs: config.accept_invalid_certs.unwrap_or(false),
            output: layout,
            log_dir: output
                .log_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            verbose: args.verbose,
        })
    }
}

fn resolve_gateway<F>(args: &Args, from_config: Option<&str>, env: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let hint = format!(
        "Pass it as the first argument (e.g. https://gateway.qg2.apps.qualys.com), \
         use --base_url_env with {} set, or set gateway_url in {}",
        BASE_URL_ENV, CONFIG_FILENAME
    );

    if args.base_url_env {
        return env(BASE_URL_ENV).ok_or_else(|| {
            ExportError::configuration(
                format!("--base_url_env was given but {} is not set.", BASE_URL_ENV),
                hint,
            )
            .into()
        });
    }

    args.base_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .or(from_config)
        .map(str::to_string)
        .ok_or_else(|| ExportError::configuration("BASE_URL is required.", hint).into())
}

/// Turns the optional `--start_date` / `--end_date` pair into a selection.
///
/// A lone start runs up to `today`; a lone end looks back 52 weeks from it.
pub fn resolve_date_range(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> Result<DateRangeSelection> {
    let parse = |value: Option<&str>| -> Result<Option<NaiveDate>> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(parse_calendar_date)
            .transpose()
    };

    let selection = match (parse(start)?, parse(end)?) {
        (None, None) => DateRangeSelection::Default,
        (Some(start), Some(end)) => DateRangeSelection::Explicit { start, end },
        (Some(start), None) => DateRangeSelection::Explicit { start, end: today },
        (None, Some(end)) => DateRangeSelection::Explicit {
            start: lookback_start(end)?,
            end,
        },
    };

    if let DateRangeSelection::Explicit { start, end } = selection {
        if start > end {
            return Err(ExportError::invalid_date_range(format!(
                "start date {} is after end date {}",
                start, end
            ))
            .into());
        }
    }

    Ok(selection)
}

/// Creates the output, staging and log directories.
pub fn ensure_directories(settings: &Settings) -> Result<()> {
    settings.output.create_all()?;
    std::fs::create_dir_all(&settings.log_dir).with_context(|| {
        format!(
            "Failed to create log directory: {}",
            settings.log_dir.display()
        )
    })?;
    Ok(())
}
