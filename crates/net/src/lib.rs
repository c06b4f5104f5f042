#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for gh2npm
//!
//! This crate owns the shared HTTP client and the asset downloader with
//! its progress feed. There is no retry layer: a failed request fails
//! the run.

mod client;
mod download;

pub use client::{NetClient, NetConfig};
pub use download::{Download, DownloadResult};

use gh2npm_errors::Error;
use gh2npm_events::EventSender;
use std::path::Path;

/// Download a remote file into `dest_dir` under `file_name`, reporting
/// progress through the event channel
///
/// # Errors
///
/// Returns an error if the URL is invalid, the download fails, or there
/// are I/O errors while writing the file.
pub async fn download_file(
    client: &NetClient,
    url: &str,
    dest_dir: &Path,
    file_name: &str,
    tx: &EventSender,
) -> Result<DownloadResult, Error> {
    let download = Download::new(url)?;
    download.execute(client, dest_dir, file_name, tx).await
}
