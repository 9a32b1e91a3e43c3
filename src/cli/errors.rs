//! CLI-specific error types

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::memory::FixtureError;
use crate::resolver::ResolverError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// Content store fixture error
    StoreError,
    /// I/O error (stdout)
    IoError,
    /// Resolution failed
    ResolveFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "REVIEW_CLI_CONFIG_ERROR",
            Self::StoreError => "REVIEW_CLI_STORE_ERROR",
            Self::IoError => "REVIEW_CLI_IO_ERROR",
            Self::ResolveFailed => "REVIEW_CLI_RESOLVE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// Store fixture error
    pub fn store_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::StoreError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<FixtureError> for CliError {
    fn from(e: FixtureError) -> Self {
        Self::store_error(e.to_string())
    }
}

impl From<ResolverError> for CliError {
    fn from(e: ResolverError) -> Self {
        Self::new(
            CliErrorCode::ResolveFailed,
            format!("{}: {}", e.code(), e),
        )
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
