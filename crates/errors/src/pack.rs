//! Packaging tool invocation error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum PackagingError {
    #[error("failed to start {command}: {message}")]
    SpawnFailed { command: String, message: String },

    #[error("{command} exited with status {code}")]
    ExitFailure { command: String, code: i32 },

    #[error("{command} terminated by signal")]
    Terminated { command: String },
}
