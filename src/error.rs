//! Error types for schema comparison

use std::path::PathBuf;

use thiserror::Error;

/// Result type for comparison operations
pub type Result<T> = std::result::Result<T, CompareError>;

/// Schema comparison errors
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Directory '{}' not found.", .path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("'{program}' tool not found. {hint}")]
    ToolNotFound { program: String, hint: String },

    #[error("Invalid naming convention: {0}")]
    InvalidConvention(String),

    #[error("Comparison interrupted by user.")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl CompareError {
    /// Whether the error stems from user input or environment setup rather than a
    /// failure during the comparison itself
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CompareError::DirectoryNotFound { .. }
                | CompareError::ToolNotFound { .. }
                | CompareError::InvalidConvention(_)
                | CompareError::Config(_)
        )
    }
}
