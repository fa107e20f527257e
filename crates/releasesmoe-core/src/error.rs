//! Error types for the releases.moe search adapter
//!
//! Transport failures never show up here: the fetcher swallows them and
//! returns an empty body. What remains are failures that end a search.

use thiserror::Error;

/// Error type for all releases.moe search operations
#[derive(Error, Debug)]
pub enum ReleasesMoeError {
    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API response was not the JSON shape we expected
    #[error("Unexpected API response: {0}")]
    Json(#[from] serde_json::Error),

    /// Release entry points at an AniList id that was never resolved
    #[error("Release refers to unknown AniList id {0}")]
    UnknownTitle(i64),

    /// Query was empty after decoding
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Configuration could not be loaded or parsed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Writing a result row failed
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ReleasesMoeError {
    fn from(err: figment::Error) -> Self {
        ReleasesMoeError::Config(err.to_string())
    }
}

/// Result type alias for releases.moe operations
pub type Result<T> = std::result::Result<T, ReleasesMoeError>;
