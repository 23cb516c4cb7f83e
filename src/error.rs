//! # Error Types
//!
//! Custom error types for Backpack Tool using `thiserror`.

use thiserror::Error;

/// Main error type for Backpack Tool
#[derive(Debug, Error)]
pub enum BackpackError {
    /// Firmware image format errors (bad magic, truncated segment table)
    #[error("firmware format error: {0}")]
    Format(String),

    /// Frame payload does not fit the protocol's length field
    #[error("payload too large: {actual} bytes exceeds maximum of {max}")]
    PayloadTooLarge { actual: usize, max: usize },

    /// Frame failed validation (bad sync, length or CRC mismatch)
    #[error("frame integrity error: {0}")]
    Integrity(String),

    /// Serial transport errors
    #[error("serial error: {0}")]
    Serial(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Runtime options serialization errors
    #[error("options encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Backpack Tool
pub type Result<T> = std::result::Result<T, BackpackError>;
