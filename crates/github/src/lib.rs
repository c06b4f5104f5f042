#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! GitHub release resolution for gh2npm
//!
//! Wraps the REST releases endpoints behind an explicit client object.
//! Listing follows the `Link` header through every page; a failure on
//! any page fails the whole listing, partial results are never
//! returned.

mod version;

pub use version::version_from_tag;

use gh2npm_errors::{ApiError, Error};
use gh2npm_net::NetClient;
use reqwest::header::{ACCEPT, LINK, RETRY_AFTER};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use url::Url;

/// GitHub REST API base URL
pub const API_BASE: &str = "https://api.github.com";

/// Releases fetched per page when listing
const PER_PAGE: u32 = 100;

const ACCEPT_JSON: &str = "application/vnd.github+json";

/// A published release with its downloadable assets
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A single release asset
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
    pub size: u64,
}

/// Client for the GitHub releases API
///
/// Holds the shared [`NetClient`] plus an optional bearer token. The
/// base URL is swappable so tests can point it at a local server.
#[derive(Clone, Debug)]
pub struct GithubClient {
    net: NetClient,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    /// Create a client against the public GitHub API
    #[must_use]
    pub fn new(net: NetClient, token: Option<String>) -> Self {
        Self::with_base_url(net, token, API_BASE)
    }

    /// Create a client against an alternative API base URL
    #[must_use]
    pub fn with_base_url(net: NetClient, token: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            net,
            base_url: base_url.into(),
            token,
        }
    }

    /// List every release of a repository, oldest pages last
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails, returns a non-success
    /// status, or cannot be decoded.
    pub async fn list_all_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>, Error> {
        let mut releases = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!(
                "{}/repos/{owner}/{repo}/releases?per_page={PER_PAGE}&page={page}",
                self.base_url
            );
            let response = self.get(&url).await?;
            let next = next_page(&response);

            let batch: Vec<Release> = response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse {
                    message: e.to_string(),
                })?;
            releases.extend(batch);

            match next {
                Some(n) => page = n,
                None => break,
            }
        }

        Ok(releases)
    }

    /// Fetch a single release by its tag name
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ReleaseNotFound`] when the tag does not
    /// exist, and other API errors on request or decode failure.
    pub async fn get_release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Release, Error> {
        let url = format!("{}/repos/{owner}/{repo}/releases/tags/{tag}", self.base_url);
        let response = self.send(&url).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::ReleaseNotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
                tag: tag.to_string(),
            }
            .into());
        }
        let response = check_status(response, &url)?;

        response
            .json()
            .await
            .map_err(|e| {
                ApiError::InvalidResponse {
                    message: e.to_string(),
                }
                .into()
            })
    }

    /// Issue an authenticated GET without inspecting the status
    async fn send(&self, url: &str) -> Result<Response, Error> {
        let request = self.net.inner().get(url).header(ACCEPT, ACCEPT_JSON);
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        request
            .send()
            .await
            .map_err(|e| {
                ApiError::RequestFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                }
                .into()
            })
    }

    /// Issue an authenticated GET and reject non-success statuses
    async fn get(&self, url: &str) -> Result<Response, Error> {
        let response = self.send(url).await?;
        check_status(response, url)
    }
}

/// Map rate-limit and generic error statuses, pass successes through
fn check_status(response: Response, url: &str) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && rate_limit_exhausted(&response))
    {
        let seconds = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);
        return Err(ApiError::RateLimited { seconds }.into());
    }

    Err(ApiError::HttpStatus {
        status: status.as_u16(),
        url: url.to_string(),
    }
    .into())
}

fn rate_limit_exhausted(response: &Response) -> bool {
    response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        == Some("0")
}

/// Extract the page number of the `rel="next"` link, if any
fn next_page(response: &Response) -> Option<u32> {
    let link = response.headers().get(LINK)?.to_str().ok()?;
    parse_next_page(link)
}

/// Parse a `Link` header into the next page number
///
/// The header carries comma-separated `<url>; rel="kind"` entries; the
/// page number rides in the `page` query parameter of the `next` entry.
fn parse_next_page(link: &str) -> Option<u32> {
    for entry in link.split(',') {
        let mut parts = entry.trim().split(';');
        let Some(target) = parts.next() else {
            continue;
        };
        if !parts.any(|p| p.trim() == "rel=\"next\"") {
            continue;
        }

        let target = target.trim();
        let url = target.strip_prefix('<')?.strip_suffix('>')?;
        let url = Url::parse(url).ok()?;
        return url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok());
    }
    None
}
