//! Error types for the deadline manager.
//!
//! Exit codes used by the `sdm` binary:
//! - 0: Success
//! - 2: User error (invalid input, unknown task, bad configuration)
//! - 4: Storage failure (the in-memory state was not persisted)

use thiserror::Error;

/// Exit codes for the sdm CLI.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const STORAGE_FAILED: i32 = 4;
}

/// Main error type for deadline operations.
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Multiple tasks are titled '{title}' ({ids}); use the task ID instead")]
    AmbiguousTask { title: String, ids: String },

    #[error("Duplicate task ID: {0}")]
    DuplicateId(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // Storage failures (exit code 4)
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::NotFound(_)
            | Error::AmbiguousTask { .. }
            | Error::DuplicateId(_)
            | Error::Config(_)
            | Error::TomlParse(_) => exit_codes::USER_ERROR,

            Error::Storage(_) | Error::Io(_) | Error::Json(_) => exit_codes::STORAGE_FAILED,
        }
    }
}

/// Result type alias for deadline operations.
pub type Result<T> = std::result::Result<T, Error>;
