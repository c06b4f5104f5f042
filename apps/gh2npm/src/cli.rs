//! Command line interface definition

use clap::Parser;
use std::path::PathBuf;

/// gh2npm - package GitHub release binaries for npm
#[derive(Parser)]
#[command(name = "gh2npm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Download GitHub release binaries and hand them to npm-binary-releaser")]
#[command(long_about = None)]
pub struct Cli {
    /// Path to the JSON run configuration
    #[arg(short, long, value_name = "PATH")]
    pub config: PathBuf,

    /// Process only the release with this tag instead of all releases
    #[arg(short, long, value_name = "TAG")]
    pub tag: Option<String>,

    /// Pass --publish to the releaser (default is a dry run)
    #[arg(short, long)]
    pub publish: bool,

    /// Output the run report in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
