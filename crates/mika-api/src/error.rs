use thiserror::Error;

/// Errors from the catalogue API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("movie not found: {0}")]
    NotFound(String),

    #[error("invalid page {0}: pages start at 1")]
    InvalidPage(u32),

    #[error("invalid year {0}")]
    InvalidYear(u32),

    #[error("slug must not be empty")]
    EmptySlug,

    #[error("search keyword must not be empty")]
    EmptyKeyword,
}
