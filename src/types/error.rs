use thiserror::Error;

/// radquiz error types
#[derive(Error, Debug)]
pub enum RadquizError {
    /// Failed to parse JSON
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache operation failed
    #[error("cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Activity backend request failed
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Calendar-day key is not `YYYY-MM-DD`
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Result type alias for radquiz
pub type Result<T> = std::result::Result<T, RadquizError>;
