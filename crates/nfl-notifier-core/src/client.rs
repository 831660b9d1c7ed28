//! HTTP client for ran.de
//!
//! This module provides the client used to fetch the broadcast schedule page.
//! One run performs exactly one fetch, so there is no retry or throttling
//! machinery; the request carries a bounded timeout and German-language
//! headers matching the content the parser expects.

use std::time::Duration;

use crate::error::{NotifierError, Result};

/// Base URL for ran.de
pub const RAN_BASE_URL: &str = "https://www.ran.de";

/// Path of the NFL live broadcast schedule page
pub const NFL_LIVE_PATH: &str = "/us-sport/nfl/live";

/// Default User-Agent mimicking a modern browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default Accept-Language header for German content
const DEFAULT_ACCEPT_LANGUAGE: &str = "de-DE,de;q=0.9,en;q=0.8";

/// Configuration for the ran.de HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// HTTP client for fetching ran.de pages
pub struct RanClient {
    /// Underlying HTTP client
    client: reqwest::Client,
}

impl RanClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT_LANGUAGE,
                    reqwest::header::HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
                );
                headers
            })
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch HTML content from a ran.de path
    ///
    /// # Arguments
    /// * `path` - Relative path on ran.de (e.g. "/us-sport/nfl/live")
    ///
    /// # Returns
    /// The HTML content as a string
    ///
    /// # Errors
    /// - `NotifierError::Http` - Network error or timeout
    /// - `NotifierError::PageUnavailable` - Non-success status code
    pub async fn fetch(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", RAN_BASE_URL, path);
        self.fetch_url(&url).await
    }

    /// Fetch HTML content from an absolute URL
    ///
    /// Used by tests to point the client at a local server.
    pub async fn fetch_url(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(NotifierError::PageUnavailable {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
