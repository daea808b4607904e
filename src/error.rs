//! Error types and result definitions

use thiserror::Error;

/// Result type alias for Pipewatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Pipewatch
///
/// The telemetry generator is total and never produces one of these; they come
/// from configuration, the HTTP server and the polling monitor.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}
