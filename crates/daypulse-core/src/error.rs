//! Core error types for daypulse-core.
//!
//! The engine itself never fails on bad task data; these errors cover
//! contract violations at the boundary (malformed exports, inverted date
//! ranges) and configuration I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for daypulse-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not determine where the config lives
    #[error("Could not resolve configuration directory: {0}")]
    NoDataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Date range with start after end
    #[error("Invalid date range: start ({start}) is after end ({end})")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// A required list was null or missing
    #[error("Missing task list: {0}")]
    MissingTaskList(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
