//! Error types for wiregen runtime operations.

use thiserror::Error;

/// Runtime error type for codec operations on generated types.
#[derive(Debug, Error)]
pub enum Error {
    /// JSON encoding or decoding failed.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML encoding or decoding failed.
    #[error("YAML codec error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// An error category string is not one of the fixed categories.
    #[error("unknown error code '{code}'")]
    UnknownErrorCode {
        /// The rejected code.
        code: String,
    },
}

/// Result type alias for wiregen runtime operations.
pub type Result<T> = std::result::Result<T, Error>;
