#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level run orchestration for gh2npm
//!
//! This crate serves as the orchestration layer between the CLI and the
//! pipeline crates. A run resolves one or all releases of a repository,
//! stages each release's assets and hands the staging directory to the
//! external packaging tool.

mod context;
mod pack;
mod publish;

pub use context::{OpsContextBuilder, OpsCtx};
pub use pack::{invoke_releaser, pack_args};
pub use publish::run;

use gh2npm_errors::Error;

/// Run outcome that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
pub struct RunReport {
    /// Versions packaged, in processing order
    pub versions: Vec<String>,
    /// Whether the publish flag was withheld from the releaser
    pub dry_run: bool,
}

impl RunReport {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}
