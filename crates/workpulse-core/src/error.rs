//! Core error types for workpulse-core.
//!
//! Data-quality problems (unparseable numbers, empty groups, degenerate
//! inputs) are never errors: the statistics functions filter or default
//! instead. The types here cover configuration, I/O and caller mistakes.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for workpulse-core.
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
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No usable configuration directory
    #[error("Cannot determine configuration directory")]
    NoConfigDir,
}

/// Validation errors for caller-supplied arguments.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Aggregation operation name is not one of avg/sum/min/max
    #[error("Unknown aggregate operation '{0}' (expected avg, sum, min or max)")]
    UnknownOp(String),

    /// An aggregation spec was not of the form `field:op`
    #[error("Invalid aggregation spec '{0}' (expected field:op)")]
    InvalidAggregateSpec(String),

    /// Band boundaries must be finite and strictly increasing
    #[error("Invalid bands: {0}")]
    InvalidBands(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_converts_into_core_error() {
        let err: CoreError = ValidationError::UnknownOp("median".into()).into();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().contains("median"));
    }

    #[test]
    fn test_config_error_display_includes_key() {
        let err = ConfigError::UnknownKey("fields.nope".into());
        assert_eq!(err.to_string(), "Unknown configuration key: fields.nope");
    }
}
