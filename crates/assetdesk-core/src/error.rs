//! Error types for assetdesk-core
//!
//! Error codes, severities and user-facing suggestions for everything the
//! report and reminder layers can fail on.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Data export could not be decoded
    ParseError,
    /// IO error
    IoError,
    /// Configuration error
    ConfigError,
    /// File not found
    FileNotFound,
    /// Reminder is not due yet
    ReminderNotDue,
    /// No mail recipient could be resolved
    NoRecipients,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            ErrorCode::ReminderNotDue => write!(f, "REMINDER_NOT_DUE"),
            ErrorCode::NoRecipients => write!(f, "NO_RECIPIENTS"),
        }
    }
}

/// Detailed error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for assetdesk-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("IO error occurred")]
    IoError,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Reminder {id} is not due yet")]
    ReminderNotDue { id: String },

    #[error("No recipient found for reminder {id}")]
    NoRecipients { id: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ParseError { .. } => ErrorCode::ParseError,
            CoreError::IoError => ErrorCode::IoError,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
            CoreError::FileNotFound { .. } => ErrorCode::FileNotFound,
            CoreError::ReminderNotDue { .. } => ErrorCode::ReminderNotDue,
            CoreError::NoRecipients { .. } => ErrorCode::NoRecipients,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::ParseError { .. } => ErrorSeverity::Error,
            CoreError::IoError => ErrorSeverity::Error,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
            CoreError::FileNotFound { .. } => ErrorSeverity::Error,
            CoreError::ReminderNotDue { .. } => ErrorSeverity::Info,
            CoreError::NoRecipients { .. } => ErrorSeverity::Warning,
        }
    }

    /// Localized text shown to the desk staff
    pub fn user_message(&self) -> String {
        match self {
            CoreError::ParseError { .. } | CoreError::IoError | CoreError::FileNotFound { .. } => {
                "Không thể tải dữ liệu từ cơ sở dữ liệu".to_string()
            }
            CoreError::ReminderNotDue { .. } => "Nhắc nhở CRC này chưa đến hạn".to_string(),
            CoreError::NoRecipients { .. } => "Không tìm thấy người nhận email".to_string(),
            other => other.to_string(),
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::ParseError { message } => details
                .with_detail(serde_json::json!({ "parse_message": message }))
                .with_suggestion("Check that the export is a JSON array of records.".to_string()),
            CoreError::FileNotFound { path } => details
                .with_detail(serde_json::json!({ "path": path }))
                .with_suggestion("Check data.path and the file names in the config.".to_string()),
            CoreError::NoRecipients { .. } => details.with_suggestion(
                "Assign staff with a mailbox to the reminder roles.".to_string(),
            ),
            _ => details,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(_error: io::Error) -> Self {
        CoreError::IoError
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::ParseError {
            message: error.to_string(),
        }
    }
}

impl From<assetdesk_config::ConfigError> for CoreError {
    fn from(error: assetdesk_config::ConfigError) -> Self {
        CoreError::ConfigError {
            message: error.to_string(),
        }
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error raised while running `operation`
    fn log_error(&self, error: &CoreError, operation: &str);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, operation: &str) {
        match error.severity() {
            ErrorSeverity::Info => log::info!(
                target: "assetdesk::error",
                "[{}] {} - Operation: {}",
                error.code(),
                error,
                operation
            ),
            ErrorSeverity::Warning => log::warn!(
                target: "assetdesk::error",
                "[{}] {} - Operation: {}",
                error.code(),
                error,
                operation
            ),
            ErrorSeverity::Error | ErrorSeverity::Critical => log::error!(
                target: "assetdesk::error",
                "{} - Operation: {}",
                error.to_details(),
                operation
            ),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::ParseError.to_string(), "PARSE_ERROR");
        assert_eq!(ErrorCode::ReminderNotDue.to_string(), "REMINDER_NOT_DUE");
    }

    #[test]
    fn test_core_error_severity() {
        assert_eq!(
            CoreError::ConfigError { message: "x".to_string() }.severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(CoreError::IoError.severity(), ErrorSeverity::Error);
        assert_eq!(
            CoreError::ReminderNotDue { id: "1".to_string() }.severity(),
            ErrorSeverity::Info
        );
    }

    #[test]
    fn test_error_details_parse_error() {
        let error = CoreError::ParseError {
            message: "expected value at line 1".to_string(),
        };
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::ParseError);
        assert!(details.details.is_some());
        assert!(!details.suggestions.is_empty());
    }

    #[test]
    fn test_user_message_is_localized() {
        assert_eq!(
            CoreError::IoError.user_message(),
            "Không thể tải dữ liệu từ cơ sở dữ liệu"
        );
        assert_eq!(
            CoreError::NoRecipients { id: "7".to_string() }.user_message(),
            "Không tìm thấy người nhận email"
        );
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<Vec<u32>>("{").unwrap_err();
        let core: CoreError = err.into();
        assert_eq!(core.code(), ErrorCode::ParseError);
    }

    #[test]
    fn test_from_config_error() {
        let err = assetdesk_config::ConfigError::IoError;
        let core: CoreError = err.into();
        assert_eq!(core.code(), ErrorCode::ConfigError);
    }
}
