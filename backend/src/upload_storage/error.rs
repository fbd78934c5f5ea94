//! Error types for upload storage operations

use thiserror::Error;

/// Result type for upload storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while configuring storage or signing uploads
#[derive(Error, Debug)]
pub enum StorageError {
    /// S3 service or SDK error while signing
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// Configuration error (presigning config, incomplete environment)
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
