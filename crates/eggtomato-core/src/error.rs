//! Core error types for eggtomato-core.
//!
//! State-machine operations never fail; these types cover storage,
//! configuration and rejected user input.

use std::path::PathBuf;
use thiserror::Error;

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// In-memory store mutex was poisoned
    #[error("Store lock poisoned")]
    Poisoned,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Rejected input. The state it was aimed at is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Free-mode duration outside `(0, max]`
    #[error("Duration {duration_ms}ms is outside 1..={max_ms}ms")]
    DurationOutOfRange { duration_ms: u64, max_ms: u64 },

    /// Pomodoro setting outside its allowed range
    #[error("Invalid value for '{field}': {value} (allowed {min}..={max})")]
    InvalidSetting {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// Unparseable value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseBusy
                    || inner.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_name_the_field() {
        let err = ValidationError::InvalidSetting {
            field: "work_minutes",
            value: 0,
            min: 1,
            max: 90,
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for 'work_minutes': 0 (allowed 1..=90)"
        );
    }

    #[test]
    fn toml_parse_error_maps_to_config_error() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("not = [valid");
        let err: ConfigError = parse.unwrap_err().into();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
    }
}
