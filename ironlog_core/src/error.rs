//! Error types for the ironlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ironlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected at a use-case boundary (e.g. blank exercise name)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Finalizing a session that has no exercise with at least one set
    #[error("cannot finalize an empty workout")]
    EmptyWorkout,

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// State management error
    #[error("State error: {0}")]
    State(String),
}
