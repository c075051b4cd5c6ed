use thiserror::Error;

use super::ItemKey;

/// daygrid error types
#[derive(Error, Debug)]
pub enum DaygridError {
    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Data fetch failed (may succeed on retry)
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Client answered but refused the request
    #[error("rejected: {0}")]
    Rejected(String),

    /// User input failed validation
    #[error("{0}")]
    Validation(String),

    /// No item with this key exists
    #[error("no {key}")]
    NotFound { key: ItemKey },

    /// Failed to parse a date, month or time
    #[error("parse error: {0}")]
    Parse(String),
}

impl DaygridError {
    /// Whether retrying the same call might succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}

/// Result type alias for daygrid
pub type Result<T> = std::result::Result<T, DaygridError>;
