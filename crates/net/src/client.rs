//! HTTP client with connection pooling
//!
//! Requests are issued exactly once - failed transfers are fatal to the
//! run and are never retried.

use gh2npm_errors::{DownloadError, Error};
use reqwest::{Client, Response};
use std::time::Duration;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300), // 5 minutes for large downloads
            connect_timeout: Duration::from_secs(30),
            user_agent: format!("gh2npm/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP client wrapper shared by the resolver and the downloader
#[derive(Clone, Debug)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to
    /// initialize.
    pub fn new(config: &NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| DownloadError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default
    /// settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(&NetConfig::default())
    }

    /// Execute a GET request
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure or timeout. Non-success
    /// status codes are not an error here; callers inspect the response.
    pub async fn get(&self, url: &str) -> Result<Response, Error> {
        self.client.get(url).send().await.map_err(|e| {
            if e.is_connect() {
                DownloadError::ConnectionFailed(e.to_string()).into()
            } else {
                DownloadError::TransferFailed(e.to_string()).into()
            }
        })
    }

    /// Get the underlying reqwest client for advanced usage
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}
