//! Error types for `vitrine`
//!
//! A single error hierarchy covering configuration, catalog fetch, and
//! controller failures, with Unix exit-code mapping for the CLI.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `vitrine` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Catalog error (fetch failed, malformed product data)
    pub const CATALOG_ERROR: i32 = 4;

    /// Controller error (invalid start/stop pairing, driver failure)
    pub const CONTROLLER_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `vitrine` operations.
///
/// Aggregates all domain-specific errors and provides a unified
/// interface for error handling and exit-code mapping.
#[derive(Debug, Error)]
pub enum VitrineError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Catalog fetch error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Presentation controller error
    #[error(transparent)]
    Controller(#[from] ControllerError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl VitrineError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Catalog(_) => ExitCode::CATALOG_ERROR,
            Self::Controller(_) => ExitCode::CONTROLLER_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the configuration file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Duration string could not be parsed
    #[error("invalid duration '{value}' (expected suffix: ms, s, m, h)")]
    InvalidDuration {
        /// The unparseable duration string
        value: String,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., `"presentation.reveal_interval"`)
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Validation failure that prevents the configuration from being used
    Error,
    /// Potential issue that does not prevent configuration loading
    Warning,
}

// ============================================================================
// Catalog Errors
// ============================================================================

/// Errors from the catalog fetch collaborator.
///
/// The controller never retries a failed fetch; a `CatalogError` folds
/// into the soft-wait/network-error degrade ladder instead of
/// propagating upward.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// I/O error reading a catalog file
    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Product payload could not be decoded
    #[error("malformed product data: {0}")]
    Decode(String),

    /// Scripted failure (demo and test sources)
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// Controller Errors
// ============================================================================

/// Presentation controller errors.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// `start` was called while a previous start is still live.
    /// The caller owns the start/stop pairing 1:1.
    #[error("controller already started")]
    AlreadyStarted,

    /// The driver task ended without reaching a terminal display state
    #[error("driver stopped unexpectedly: {0}")]
    DriverStopped(String),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `vitrine` operations.
pub type Result<T> = std::result::Result<T, VitrineError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::ERROR, 1);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::CATALOG_ERROR, 4);
        assert_eq!(ExitCode::CONTROLLER_ERROR, 5);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
        assert_eq!(ExitCode::INTERRUPTED, 130);
        assert_eq!(ExitCode::TERMINATED, 143);
    }

    #[test]
    fn test_controller_error_exit_code() {
        let err: VitrineError = ControllerError::AlreadyStarted.into();
        assert_eq!(err.exit_code(), ExitCode::CONTROLLER_ERROR);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err: VitrineError = ConfigError::MissingFile {
            path: PathBuf::from("/test"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_catalog_error_exit_code() {
        let err: VitrineError = CatalogError::Unavailable("down".to_string()).into();
        assert_eq!(err.exit_code(), ExitCode::CATALOG_ERROR);
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: VitrineError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue {
            path: "presentation.reveal_interval".to_string(),
            message: "must be greater than zero".to_string(),
            severity: Severity::Error,
        };
        assert_eq!(
            issue.to_string(),
            "error: must be greater than zero at presentation.reveal_interval"
        );
    }

    #[test]
    fn test_validation_issue_warning_display() {
        let issue = ValidationIssue {
            path: "catalog.url".to_string(),
            message: "url is empty".to_string(),
            severity: Severity::Warning,
        };
        assert_eq!(issue.to_string(), "warning: url is empty at catalog.url");
    }

    #[test]
    fn test_invalid_duration_display() {
        let err = ConfigError::InvalidDuration {
            value: "30x".to_string(),
        };
        assert!(err.to_string().contains("30x"));
        assert!(err.to_string().contains("ms, s, m, h"));
    }
}
