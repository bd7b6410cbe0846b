//! Error types for triage
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, malformed batch, nothing analyzed yet)
//! - 3: Batch rejected (dependency cycle)
//! - 4: Operation failed (io, lock, serialization)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the triage CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const REJECTED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for triage operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid task input: {0}")]
    InvalidInput(String),

    #[error("No analyzed tasks available in {0}")]
    NoAnalysis(PathBuf),

    // Rejections (exit code 3)
    #[error("Circular dependencies detected: {}", cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::InvalidInput(_)
            | Error::NoAnalysis(_) => exit_codes::USER_ERROR,

            Error::CircularDependency { .. } => exit_codes::REJECTED,

            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for machine-readable error output.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::CircularDependency { cycle } => Some(serde_json::json!({ "cycle": cycle })),
            Error::NoAnalysis(path) | Error::LockFailed(path) => {
                Some(serde_json::json!({ "path": path.display().to_string() }))
            }
            Error::InvalidConfig(message)
            | Error::InvalidArgument(message)
            | Error::InvalidInput(message) => Some(serde_json::json!({ "message": message })),
            _ => None,
        }
    }
}

/// Result type alias for triage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
