//! Error types shared across the PIM workspace

use thiserror::Error;

/// Result type alias for PIM operations
pub type Result<T> = std::result::Result<T, PimError>;

/// Main error type for PIM shared infrastructure
#[derive(Error, Debug)]
pub enum PimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging setup error: {0}")]
    Logging(String),
}
