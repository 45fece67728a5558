//! Error types for sevkiyat-rapor

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("CSV loader error: {0}")]
    CsvLoader(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Excel export error: {0}")]
    Excel(String),

    #[error("Personnel roster is empty; load the roster before aggregating")]
    EmptyRoster,

    #[error("Aggregation failed: {0}")]
    Aggregation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
