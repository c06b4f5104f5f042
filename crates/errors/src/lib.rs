#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the gh2npm release pipeline
//!
//! This crate provides fine-grained error types organized by domain.
//! Every pipeline stage returns a typed failure; nothing terminates the
//! process except the top-level CLI handler.

use std::borrow::Cow;

use thiserror::Error;

pub mod api;
pub mod archive;
pub mod config;
pub mod network;
pub mod pack;

// Re-export all error types at the root
pub use api::ApiError;
pub use archive::ExtractionError;
pub use config::ConfigError;
pub use network::DownloadError;
pub use pack::PackagingError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Error)]
pub enum Error {
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("packaging error: {0}")]
    Packaging(#[from] PackagingError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
        path: Option<std::path::PathBuf>,
    },
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an Io error with an associated path
    pub fn io_with_path(err: &std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}

/// Result type alias for gh2npm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Io { message, .. } => Cow::Owned(message.clone()),
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Config(_) => Some("Check your gh2npm configuration file."),
            Error::Api(ApiError::RateLimited { .. }) => {
                Some("Set GITHUB_TOKEN to raise the API rate limit.")
            }
            Error::Api(ApiError::ReleaseNotFound { .. }) => {
                Some("Verify the tag exists on the repository's releases page.")
            }
            Error::Packaging(PackagingError::SpawnFailed { .. }) => {
                Some("Ensure the npm-binary-releaser executable is present and executable.")
            }
            _ => None,
        }
    }
}
