//! Error types for holisync.

use thiserror::Error;

/// Errors that can occur in holisync operations.
#[derive(Error, Debug)]
pub enum HolisyncError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for holisync operations.
pub type HolisyncResult<T> = Result<T, HolisyncError>;
