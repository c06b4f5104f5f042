//! Asset download error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum DownloadError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("transfer failed: {0}")]
    TransferFailed(String),

    #[error("failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },
}
