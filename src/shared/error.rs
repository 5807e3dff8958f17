use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow a scheduler (cron, CI) to distinguish between
/// credential problems, bad invocations and runtime failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - every window was either exported or already present
    Success = 0,
    /// Invalid command-line arguments, configuration or date range
    InvalidArguments = 2,
    /// Application error (file I/O, fetch error under the abort policy, etc.)
    ApplicationError = 3,
    /// Neither the primary nor the fallback token was accepted
    AuthenticationFailed = 4,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Classifies a run failure into the exit code reported to the caller.
    pub fn from_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<ExportError>() {
            Some(ExportError::Configuration { .. }) | Some(ExportError::InvalidDateRange { .. }) => {
                ExitCode::InvalidArguments
            }
            Some(ExportError::Authentication { .. }) => ExitCode::AuthenticationFailed,
            _ => ExitCode::ApplicationError,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
            ExitCode::AuthenticationFailed => write!(f, "Authentication Failed (4)"),
        }
    }
}

/// Application-specific errors for the weekly inventory export.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Configuration error: {message}\n\n💡 Hint: {hint}")]
    Configuration { message: String, hint: String },

    #[error("Invalid date range: {details}\n\n💡 Hint: Use YYYY-MM-DD dates with the start date on or before the end date")]
    InvalidDateRange { details: String },

    #[error("Authentication failed{}: {details}\n\n💡 Hint: Export a valid QUALYS_TOKEN (and optionally QUALYS_FALLBACK_TOKEN) and try again", status_suffix(.status))]
    Authentication { status: Option<u16>, details: String },

    #[error("Failed to fetch window {window}{}: {details}", status_suffix(.status))]
    Fetch {
        window: String,
        status: Option<u16>,
        details: String,
    },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },
}

impl ExportError {
    pub fn configuration(message: impl Into<String>, hint: impl Into<String>) -> Self {
        ExportError::Configuration {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn invalid_date_range(details: impl Into<String>) -> Self {
        ExportError::InvalidDateRange {
            details: details.into(),
        }
    }

    /// Whether this failure must terminate the whole run rather than one window.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ExportError::Fetch { .. })
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (HTTP {})", code))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
        assert_eq!(ExitCode::AuthenticationFailed.as_i32(), 4);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::AuthenticationFailed),
            "Authentication Failed (4)"
        );
    }

    #[test]
    fn test_exit_code_from_error_classification() {
        let auth: anyhow::Error = ExportError::Authentication {
            status: Some(401),
            details: "rejected".to_string(),
        }
        .into();
        assert_eq!(ExitCode::from_error(&auth), ExitCode::AuthenticationFailed);

        let range: anyhow::Error = ExportError::invalid_date_range("start after end").into();
        assert_eq!(ExitCode::from_error(&range), ExitCode::InvalidArguments);

        let config: anyhow::Error = ExportError::configuration("missing token", "export it").into();
        assert_eq!(ExitCode::from_error(&config), ExitCode::InvalidArguments);

        let other = anyhow::anyhow!("disk full");
        assert_eq!(ExitCode::from_error(&other), ExitCode::ApplicationError);
    }

    #[test]
    fn test_exit_code_from_wrapped_error() {
        let err = anyhow::Error::from(ExportError::Authentication {
            status: None,
            details: "malformed".to_string(),
        })
        .context("while fetching");
        assert_eq!(ExitCode::from_error(&err), ExitCode::AuthenticationFailed);
    }

    #[test]
    fn test_authentication_display_includes_status() {
        let error = ExportError::Authentication {
            status: Some(403),
            details: "Token rejected".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Authentication failed (HTTP 403)"));
        assert!(display.contains("Token rejected"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_fetch_display_without_status() {
        let error = ExportError::Fetch {
            window: "2025-01-06..2025-01-13".to_string(),
            status: None,
            details: "connection reset".to_string(),
        };
        let display = format!("{}", error);
        assert_eq!(
            display,
            "Failed to fetch window 2025-01-06..2025-01-13: connection reset"
        );
    }

    #[test]
    fn test_is_fatal() {
        assert!(!ExportError::Fetch {
            window: "w".to_string(),
            status: Some(500),
            details: "boom".to_string(),
        }
        .is_fatal());
        assert!(ExportError::Authentication {
            status: Some(401),
            details: "no".to_string(),
        }
        .is_fatal());
    }

    #[test]
    fn test_file_write_error_display() {
        let error = ExportError::FileWriteError {
            path: PathBuf::from("/test/output.json"),
            details: "Permission denied".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to write to file"));
        assert!(display.contains("/test/output.json"));
        assert!(display.contains("Permission denied"));
    }
}
