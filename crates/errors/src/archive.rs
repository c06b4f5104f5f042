//! Archive normalization error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ExtractionError {
    #[error("no entry matching package {package} in {archive}")]
    PayloadNotFound { archive: String, package: String },

    #[error("corrupt archive stream in {archive}: {message}")]
    CorruptStream { archive: String, message: String },

    #[error("failed to write extracted payload {path}: {message}")]
    WriteFailed { path: String, message: String },
}
