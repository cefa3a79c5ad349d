//! Error types for ferthe.
//!
//! Uses `thiserror` for ergonomic error definitions. Errors that cross the
//! service-contract boundary are converted into [`ErrorResult`] values.

use crate::contracts::ErrorResult;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while running a discovery scan.
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("a scan is already in progress for {0}")]
    ScanInProgress(String),

    #[error("scan timed out after {0} ms")]
    Timeout(u64),

    #[error("trail not found: {0}")]
    TrailNotFound(String),

    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    /// The sensor application answered with an error envelope.
    #[error("sensor application failed: {0}")]
    Rejected(ErrorResult),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl SensorError {
    /// Stable machine-readable code used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ScanInProgress(_) => "SCAN_IN_PROGRESS",
            Self::Timeout(_) => "SCAN_TIMEOUT",
            Self::TrailNotFound(_) => "TRAIL_NOT_FOUND",
            Self::LocationUnavailable(_) => "LOCATION_UNAVAILABLE",
            Self::Rejected(_) => "SENSOR_REJECTED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl From<SensorError> for ErrorResult {
    fn from(err: SensorError) -> Self {
        match err {
            // Keep the original envelope instead of wrapping it twice.
            SensorError::Rejected(inner) => inner,
            other => ErrorResult::new(other.to_string(), other.code()),
        }
    }
}

/// Result type alias for scan operations.
pub type SensorResult<T> = Result<T, SensorError>;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the user's home directory")]
    DirectoryNotFound,

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("{key} is required when {reason}")]
    MissingValue { key: &'static str, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Local storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("ambiguous prefix '{prefix}': {matches} matches")]
    Ambiguous { prefix: String, matches: usize },

    #[error("failed to access {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("'{0}' cannot be used as a file name")]
    InvalidFileName(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Top-level CLI errors.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Sensor(#[from] SensorError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Id(#[from] crate::types::IdError),

    #[error(transparent)]
    Geo(#[from] crate::types::GeoError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
