//! Error types for the procurement simulation
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI
//!
//! Errors fall into three user-facing families: input errors (blank decision,
//! unknown day) are rejected before any model call, service errors are caught
//! per persona by the evaluator, and configuration errors stop the program
//! before a simulation can start.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for simulation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,
    CatalogInvalid = 103,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Input errors (3xx)
    InputBlank = 300,
    ScenarioNotFound = 301,

    // Model service errors (4xx)
    ServiceUnavailable = 400,
    ServiceTimeout = 401,
    ServiceMalformed = 402,
    ServiceRejected = 403,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Input errors
            400..=499 => 40, // Service errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    /// Scenario catalog could not be loaded or is inconsistent
    #[error("Invalid scenario catalog: {message}")]
    CatalogInvalid { message: String },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Input Errors
    // ─────────────────────────────────────────────────────────────

    /// The intern's decision was empty or whitespace only
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// No scenario matches the requested day
    #[error("No scenario for day '{day}'")]
    ScenarioNotFound { day: String },

    // ─────────────────────────────────────────────────────────────
    // Model Service Errors
    // ─────────────────────────────────────────────────────────────

    /// Endpoint unreachable or the request could not be sent
    #[error("Model service unavailable at {url}: {message}")]
    ServiceUnavailable { url: String, message: String },

    /// Request exceeded the client timeout
    #[error("Model request to {url} timed out after {timeout_secs}s")]
    ServiceTimeout { url: String, timeout_secs: u64 },

    /// Response arrived but could not be turned into text
    #[error("Malformed model response: {message}")]
    ServiceMalformed { message: String },

    /// Endpoint answered with an error status
    #[error("Model service returned {status}: {body}")]
    ServiceRejected { status: u16, body: String },

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,
            Error::CatalogInvalid { .. } => ErrorCode::CatalogInvalid,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,
            Error::Json(_) => ErrorCode::InternalError,

            Error::InvalidInput { .. } => ErrorCode::InputBlank,
            Error::ScenarioNotFound { .. } => ErrorCode::ScenarioNotFound,

            Error::ServiceUnavailable { .. } => ErrorCode::ServiceUnavailable,
            Error::ServiceTimeout { .. } => ErrorCode::ServiceTimeout,
            Error::ServiceMalformed { .. } => ErrorCode::ServiceMalformed,
            Error::ServiceRejected { .. } => ErrorCode::ServiceRejected,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Check if the error came from the model service boundary
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            Error::ServiceUnavailable { .. }
                | Error::ServiceTimeout { .. }
                | Error::ServiceMalformed { .. }
                | Error::ServiceRejected { .. }
        )
    }

    /// Check if a model request that failed this way may succeed when resent
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::ServiceUnavailable { .. } | Error::ServiceTimeout { .. } => true,
            Error::ServiceRejected { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Check if the error is fatal (no simulation may start)
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ConfigNotFound { .. }
                | Error::ConfigParse { .. }
                | Error::ConfigValidation { .. }
                | Error::CatalogInvalid { .. }
                | Error::Internal(_)
        )
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'procurement-sim config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'procurement-sim config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the [model] section: base_url must be http(s) and model must not be empty."
            ),
            Error::CatalogInvalid { .. } => Some(
                "Fix the scenario file or remove 'scenario_file' to use the bundled scenarios."
            ),

            Error::InvalidInput { .. } => Some(
                "Please enter a decision: supplier, quantities and a short justification."
            ),
            Error::ScenarioNotFound { .. } => Some(
                "Run 'procurement-sim scenarios list' to see the available days."
            ),

            Error::ServiceUnavailable { .. } => Some(
                "Is the model server running? For Ollama try 'ollama serve', or use --provider mock."
            ),
            Error::ServiceTimeout { .. } => Some(
                "Raise 'timeout_secs' in the [model] section or use a smaller model."
            ),
            Error::ServiceRejected { .. } => Some(
                "Check the model name and API key in the [model] section."
            ),

            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            code.as_str(),
            self
        );

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        let code = self.code();
        format!("[{}] {}", code.as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Create a config validation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a catalog error
    pub fn catalog_invalid(message: impl Into<String>) -> Self {
        Error::CatalogInvalid {
            message: message.into(),
        }
    }

    /// Create an input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a service unavailable error
    pub fn service_unavailable(url: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ServiceUnavailable {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn service_malformed(message: impl Into<String>) -> Self {
        Error::ServiceMalformed {
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::ConfigNotFound.as_str(), "E100");
        assert_eq!(ErrorCode::InputBlank.as_str(), "E300");
        assert_eq!(ErrorCode::ServiceUnavailable.as_str(), "E400");
        assert_eq!(ErrorCode::InternalError.as_str(), "E900");
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(ErrorCode::ConfigValidation.exit_code(), 10);
        assert_eq!(ErrorCode::IoRead.exit_code(), 20);
        assert_eq!(ErrorCode::InputBlank.exit_code(), 30);
        assert_eq!(ErrorCode::ServiceTimeout.exit_code(), 40);
        assert_eq!(ErrorCode::InternalError.exit_code(), 90);
    }

    #[test]
    fn test_error_display() {
        let err = Error::config_not_found("/path/to/config.toml");
        assert!(err.to_string().contains("/path/to/config.toml"));

        let err = Error::ServiceRejected { status: 404, body: "model not found".into() };
        assert_eq!(err.to_string(), "Model service returned 404: model not found");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::invalid_input("blank").code(), ErrorCode::InputBlank);
        assert_eq!(
            Error::ScenarioNotFound { day: "9".into() }.code(),
            ErrorCode::ScenarioNotFound
        );
        assert_eq!(
            Error::service_unavailable("http://x", "refused").code(),
            ErrorCode::ServiceUnavailable
        );
        assert_eq!(Error::catalog_invalid("dup").code(), ErrorCode::CatalogInvalid);
    }

    #[test]
    fn test_error_retryable() {
        assert!(Error::service_unavailable("url", "refused").is_retryable());
        assert!(Error::ServiceTimeout { url: "url".into(), timeout_secs: 30 }.is_retryable());
        assert!(Error::ServiceRejected { status: 503, body: String::new() }.is_retryable());
        assert!(Error::ServiceRejected { status: 429, body: String::new() }.is_retryable());
        assert!(!Error::ServiceRejected { status: 401, body: String::new() }.is_retryable());
        assert!(!Error::service_malformed("no choices").is_retryable());
        assert!(!Error::invalid_input("blank").is_retryable());
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::config_validation("bad url").is_fatal());
        assert!(!Error::config_validation("bad url").is_service_error());
        assert!(Error::service_malformed("empty").is_service_error());
        assert!(!Error::service_malformed("empty").is_fatal());
        assert!(!Error::invalid_input("blank").is_fatal());
    }

    #[test]
    fn test_error_suggestions() {
        let err = Error::config_not_found("/test");
        assert!(err.suggestion().unwrap().contains("config init"));

        let err = Error::invalid_input("blank");
        assert!(err.suggestion().unwrap().contains("Please enter a decision"));

        assert!(Error::Internal("x".into()).suggestion().is_none());
    }

    #[test]
    fn test_format_for_terminal() {
        let err = Error::config_not_found("/test/config.toml");
        let formatted = err.format_for_terminal();

        assert!(formatted.contains("E100"));
        assert!(formatted.contains("\x1b[31m"));
        assert!(formatted.contains("Hint"));
    }

    #[test]
    fn test_format_for_log() {
        let err = Error::service_malformed("no choices");
        let formatted = err.format_for_log();

        assert!(formatted.contains("[E402]"));
        assert!(!formatted.contains("\x1b["));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        assert_eq!(err.code(), ErrorCode::IoNotFound);
    }
}
