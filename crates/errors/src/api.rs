//! Release API error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("release not found: {owner}/{repo} tag {tag}")]
    ReleaseNotFound {
        owner: String,
        repo: String,
        tag: String,
    },

    #[error("API request failed: {url}: {message}")]
    RequestFailed { url: String, message: String },

    #[error("HTTP error {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("invalid API response: {message}")]
    InvalidResponse { message: String },

    #[error("rate limited: retry after {seconds} seconds")]
    RateLimited { seconds: u64 },
}
