//! Event handling and progress display

use gh2npm_events::Event;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;

/// Terminal redraw rate; rendering cost stays decoupled from the
/// 100ms progress sampling cadence.
const DRAW_RATE_HZ: u8 = 15;

/// Event handler for progress display and user feedback
pub struct EventHandler {
    /// Multi-progress manager so status lines never tear progress bars
    multi_progress: MultiProgress,
    /// Active progress bars by URL
    download_bars: HashMap<String, ProgressBar>,
    /// Whether debug events are shown
    debug: bool,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(debug: bool) -> Self {
        Self {
            multi_progress: MultiProgress::with_draw_target(ProgressDrawTarget::stderr_with_hz(
                DRAW_RATE_HZ,
            )),
            download_bars: HashMap::new(),
            debug,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Release resolution
            Event::ReleaseListStarted { owner, repo } => {
                self.show_status(&format!("Fetching releases for {owner}/{repo}"));
            }
            Event::ReleaseListCompleted { count } => {
                self.show_status(&format!("Found {count} releases"));
            }
            Event::ReleaseFetching { tag } => {
                self.show_status(&format!("Fetching release {tag}"));
            }
            Event::ReleaseProcessing {
                tag,
                version,
                asset_count,
            } => {
                self.show_status(&format!(
                    "Processing {tag} as version {version} ({asset_count} assets)"
                ));
            }
            Event::ReleaseCompleted { version } => {
                self.show_status(&format!("Release {version} packaged"));
            }

            // Staging
            Event::StagingReset { path } => {
                if self.debug {
                    self.show_status(&format!("Staging directory reset: {}", path.display()));
                }
            }
            Event::AssetSkipped { name } => {
                self.show_status(&format!("Skipping {name}"));
            }

            // Download events
            Event::DownloadStarted { url, size } => {
                self.handle_download_started(&url, size);
            }
            Event::DownloadProgress {
                url,
                bytes_downloaded,
                total_bytes,
            } => {
                self.handle_download_progress(&url, bytes_downloaded, total_bytes);
            }
            Event::DownloadCompleted { url, size: _ } => {
                self.handle_download_completed(&url);
            }
            Event::DownloadFailed { url, error } => {
                self.handle_download_failed(&url, &error);
            }

            // Normalization
            Event::ExtractionStarted { archive, dest: _ } => {
                self.show_status(&format!("Extracting {archive}"));
            }
            Event::ExtractionCompleted { dest } => {
                self.show_status(&format!("Extracted {dest}"));
            }

            // Packaging
            Event::DryRunNotice => {
                self.show_status("Dry run: the releaser is invoked without --publish");
            }
            Event::PackagingStarted { command, version } => {
                self.show_status(&format!("Running {command} for version {version}"));
            }
            Event::PackagingCompleted { version } => {
                self.show_status(&format!("Packaged version {version}"));
            }

            // General
            Event::OperationStarted { operation } => {
                self.show_status(&format!("Starting {operation}"));
            }
            Event::OperationCompleted { operation, success } => {
                if success {
                    self.show_status(&format!("Completed {operation}"));
                } else {
                    self.show_status(&format!("Finished {operation} with failures"));
                }
            }
            Event::OperationFailed { operation, error } => {
                self.show_status(&format!("Failed {operation}: {error}"));
            }
            Event::Warning { message } => {
                self.show_status(&format!("Warning: {message}"));
            }
            Event::DebugLog { message } => {
                if self.debug {
                    self.show_status(&message);
                }
            }
        }
    }

    /// Finish any bars still visible, e.g. after a mid-download abort
    pub fn finish(&mut self) {
        for (_, pb) in self.download_bars.drain() {
            pb.abandon();
        }
    }

    fn handle_download_started(&mut self, url: &str, size: Option<u64>) {
        let filename = url.split('/').next_back().unwrap_or(url);

        let pb = if let Some(total) = size {
            ProgressBar::new(total)
        } else {
            ProgressBar::new_spinner()
        };

        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(format!("Downloading {filename}"));

        let pb = self.multi_progress.add(pb);
        self.download_bars.insert(url.to_string(), pb);
    }

    fn handle_download_progress(&mut self, url: &str, bytes_downloaded: u64, total_bytes: u64) {
        if let Some(pb) = self.download_bars.get(url) {
            pb.set_length(total_bytes);
            pb.set_position(bytes_downloaded);
        }
    }

    fn handle_download_completed(&mut self, url: &str) {
        if let Some(pb) = self.download_bars.remove(url) {
            pb.finish_with_message("Downloaded");
        }
    }

    fn handle_download_failed(&mut self, url: &str, error: &str) {
        if let Some(pb) = self.download_bars.remove(url) {
            pb.abandon_with_message(format!("Failed: {error}"));
        }
    }

    /// Show status message
    fn show_status(&self, message: &str) {
        // Route through multi_progress so lines never interleave with bars
        self.multi_progress.println(message).unwrap_or(());
    }
}
