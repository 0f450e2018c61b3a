//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit.

use std::fmt;
use std::io;

use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file missing, unreadable or invalid
    ConfigError,
    /// stdin/stdout failure
    IoError,
    /// `init` found an existing data file
    AlreadyInitialized,
    /// No data file yet
    NotInitialized,
    /// Data file could not be loaded
    BootFailed,
    /// Committed state could not be written back
    PersistFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "RABBITRY_CLI_CONFIG_ERROR",
            Self::IoError => "RABBITRY_CLI_IO_ERROR",
            Self::AlreadyInitialized => "RABBITRY_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "RABBITRY_CLI_NOT_INITIALIZED",
            Self::BootFailed => "RABBITRY_CLI_BOOT_FAILED",
            Self::PersistFailed => "RABBITRY_CLI_PERSIST_FAILED",
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn already_initialized(path: &std::path::Path) -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            format!("Data file {} already exists", path.display()),
        )
    }

    pub fn not_initialized(path: &std::path::Path) -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            format!(
                "Data file {} not found. Run 'rabbitry init' first.",
                path.display()
            ),
        )
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    pub fn persist_failed(err: StoreError) -> Self {
        Self::new(
            CliErrorCode::PersistFailed,
            format!("{}: {}", err.code(), err),
        )
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

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

pub type CliResult<T> = Result<T, CliError>;
