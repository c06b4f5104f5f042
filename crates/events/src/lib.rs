#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in gh2npm
//!
//! All user-visible output goes through events - no direct logging or
//! printing is allowed outside the CLI. Pipeline components emit events
//! over an unbounded channel; the CLI renders them concurrently with the
//! running operation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Events emitted by the release pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // Release resolution
    /// Fetching the full release list for a repository
    ReleaseListStarted { owner: String, repo: String },

    /// Release list fetched
    ReleaseListCompleted { count: usize },

    /// Fetching a single release by tag
    ReleaseFetching { tag: String },

    /// A release is about to be processed
    ReleaseProcessing {
        tag: String,
        version: String,
        asset_count: usize,
    },

    /// Release processed end to end (staged and handed to the releaser)
    ReleaseCompleted { version: String },

    // Staging
    /// Staging directory wiped and recreated
    StagingReset { path: PathBuf },

    /// Asset skipped (checksum manifest)
    AssetSkipped { name: String },

    // Downloads
    /// Download started
    DownloadStarted { url: String, size: Option<u64> },

    /// Download progress update
    DownloadProgress {
        url: String,
        bytes_downloaded: u64,
        total_bytes: u64,
    },

    /// Download completed successfully
    DownloadCompleted { url: String, size: u64 },

    /// Download failed
    DownloadFailed { url: String, error: String },

    // Normalization
    /// Extracting an archive payload into staging
    ExtractionStarted { archive: String, dest: String },

    /// Archive payload extracted and the archive removed
    ExtractionCompleted { dest: String },

    // Packaging
    /// Run is a dry run: the publish flag is withheld from the releaser
    DryRunNotice,

    /// Invoking the external packaging tool
    PackagingStarted { command: String, version: String },

    /// Packaging tool exited successfully
    PackagingCompleted { version: String },

    // General
    /// Operation started
    OperationStarted { operation: String },

    /// Operation completed
    OperationCompleted { operation: String, success: bool },

    /// Operation failed
    OperationFailed { operation: String, error: String },

    /// Warning message
    Warning { message: String },

    /// Debug log message
    DebugLog { message: String },
}

/// Type alias for event sender
pub type EventSender = UnboundedSender<Event>;

/// Type alias for event receiver
pub type EventReceiver = UnboundedReceiver<Event>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Extension trait for ergonomic event emission
pub trait EventSenderExt {
    /// Emit an event, ignoring send errors - if the receiver is dropped,
    /// the pipeline just continues without a display.
    fn emit(&self, event: Event);

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(Event::DebugLog {
            message: message.into(),
        });
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(Event::Warning {
            message: message.into(),
        });
    }
}

impl EventSenderExt for EventSender {
    fn emit(&self, event: Event) {
        let _ = self.send(event);
    }
}
