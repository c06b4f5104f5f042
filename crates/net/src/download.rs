//! Asset download with concurrent progress sampling
//!
//! The transfer task streams chunks to disk while bumping a shared byte
//! counter; a sampling task polls that counter every 100ms and forwards
//! progress events to the display. Both are joined before the download
//! call returns, so the caller always observes the transfer reach 100%
//! first.

use futures::StreamExt;
use gh2npm_errors::{DownloadError, Error};
use gh2npm_events::{Event, EventSender, EventSenderExt};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;
use url::Url;

use crate::NetClient;

/// Interval at which the sampling task polls the byte counter
const SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Download operation handle
pub struct Download {
    url: Url,
}

/// Result of a download operation
#[derive(Debug)]
pub struct DownloadResult {
    pub url: String,
    pub path: PathBuf,
    pub size: u64,
}

impl Download {
    /// Create a new download
    ///
    /// # Errors
    ///
    /// Returns an error if the provided URL is invalid.
    pub fn new(url: &str) -> Result<Self, Error> {
        let url = Url::parse(url).map_err(|e| DownloadError::InvalidUrl(e.to_string()))?;
        Ok(Self { url })
    }

    /// Execute the download, staging the content as `dest_dir/file_name`
    ///
    /// The file is written in place: on failure it is left in an
    /// indeterminate, possibly partial state for the caller to inspect.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the server returns an
    /// error status, or the file cannot be written.
    pub async fn execute(
        self,
        client: &NetClient,
        dest_dir: &Path,
        file_name: &str,
        tx: &EventSender,
    ) -> Result<DownloadResult, Error> {
        let url_str = self.url.to_string();

        let response = client.get(url_str.as_str()).await?;

        if !response.status().is_success() {
            return Err(DownloadError::HttpError {
                status: response.status().as_u16(),
                message: response.status().to_string(),
            }
            .into());
        }

        let content_length = response.content_length();

        tx.emit(Event::DownloadStarted {
            url: url_str.clone(),
            size: content_length,
        });

        tokio::fs::create_dir_all(dest_dir).await?;
        let dest = dest_dir.join(file_name);
        let file = File::create(&dest)
            .await
            .map_err(|e| Error::io_with_path(&e, &dest))?;

        // Shared byte counter, only ever incremented by the transfer task
        let transferred = Arc::new(AtomicU64::new(0));
        let (done_tx, done_rx) = watch::channel(false);

        let sampler = tokio::spawn(sample_progress(
            url_str.clone(),
            content_length,
            Arc::clone(&transferred),
            done_rx,
            tx.clone(),
        ));

        let result = transfer(response, file, &dest, &transferred).await;

        // Stop the sampler and wait for its final update on both the
        // success and the failure path.
        let _ = done_tx.send(true);
        if sampler.await.is_err() {
            return Err(Error::internal("progress sampler panicked"));
        }

        match result {
            Ok(size) => {
                tx.emit(Event::DownloadCompleted {
                    url: url_str.clone(),
                    size,
                });
                Ok(DownloadResult {
                    url: url_str,
                    path: dest,
                    size,
                })
            }
            Err(e) => {
                tx.emit(Event::DownloadFailed {
                    url: url_str,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

/// Stream the response body to disk, bumping the shared counter per chunk
async fn transfer(
    response: reqwest::Response,
    mut file: File,
    dest: &Path,
    transferred: &AtomicU64,
) -> Result<u64, Error> {
    let mut stream = response.bytes_stream();
    let mut downloaded = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::TransferFailed(e.to_string()))?;

        file.write_all(&chunk)
            .await
            .map_err(|e| DownloadError::WriteFailed {
                path: dest.display().to_string(),
                message: e.to_string(),
            })?;

        downloaded += chunk.len() as u64;
        transferred.store(downloaded, Ordering::Relaxed);
    }

    file.flush()
        .await
        .map_err(|e| DownloadError::WriteFailed {
            path: dest.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(downloaded)
}

/// Poll the byte counter on a fixed cadence until the transfer signals
/// completion, then emit one final update so the display sees 100%
async fn sample_progress(
    url: String,
    total: Option<u64>,
    transferred: Arc<AtomicU64>,
    mut done: watch::Receiver<bool>,
    tx: EventSender,
) {
    let Some(total_bytes) = total else {
        // Size unknown: nothing meaningful to report, just wait for the
        // completion signal so the join ordering still holds.
        let _ = done.changed().await;
        return;
    };

    let mut interval = tokio::time::interval(SAMPLE_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                tx.emit(Event::DownloadProgress {
                    url: url.clone(),
                    bytes_downloaded: transferred.load(Ordering::Relaxed),
                    total_bytes,
                });
            }
            _ = done.changed() => {
                tx.emit(Event::DownloadProgress {
                    url,
                    bytes_downloaded: transferred.load(Ordering::Relaxed),
                    total_bytes,
                });
                return;
            }
        }
    }
}
