//! CLI error types.

use captable_waterfall::WaterfallError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Waterfall(#[from] WaterfallError),

    #[error("Failed to parse request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<captable_core::CapTableError> for CliError {
    fn from(err: captable_core::CapTableError) -> Self {
        CliError::Waterfall(err.into())
    }
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
