//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests to fetch page bodies
//! - Error classification (HTTP status, timeout, network)
//! - Enforcing the inter-request delay after each successful fetch

use crate::config::HttpConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a fetch operation
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages for one crawl invocation
///
/// The fetcher owns a session-scoped HTTP client (connection pool) that is
/// released when the fetcher is dropped, on success and failure paths alike.
/// After every successful fetch it sleeps the configured delay, uniformly for
/// all callers, to avoid overloading the remote origin.
pub struct PageFetcher {
    client: Client,
    delay: Duration,
}

impl PageFetcher {
    /// Creates a new fetcher from the HTTP configuration and inter-request delay
    ///
    /// # Arguments
    ///
    /// * `http` - HTTP client configuration
    /// * `delay_ms` - Delay enforced after each successful fetch (milliseconds)
    pub fn new(http: &HttpConfig, delay_ms: u64) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(http)?,
            delay: Duration::from_millis(delay_ms),
        })
    }

    /// Fetches a URL and returns the response body
    ///
    /// Blocks the calling task for the configured delay after a successful
    /// fetch. The delay is not applied on failures.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The response body
    /// * `Err(FetchError)` - Network failure, timeout, or non-success status
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::info!("Fetching: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(url, e))?;

        // Fixed pause between requests to the same origin
        tokio::time::sleep(self.delay).await;

        Ok(body)
    }
}

/// Classifies a reqwest error into the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}
