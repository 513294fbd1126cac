//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests for day pages and snapshot pages
//! - Error classification into a single failure reason
//!
//! No retries are made. A failed request is reported as [`FetchOutcome::Failed`] and the
//! caller treats it as contributing nothing.

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch at one of the crawl's network boundaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// The request succeeded and produced data
    Fetched(T),

    /// The request failed (timeout, connection, HTTP status or body read)
    Failed {
        /// Human-readable failure description
        reason: String,
    },
}

impl<T> FetchOutcome<T> {
    /// Returns true if the fetch failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Transforms fetched data, passing failures through untouched
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> FetchOutcome<U> {
        match self {
            Self::Fetched(data) => FetchOutcome::Fetched(f(data)),
            Self::Failed { reason } => FetchOutcome::Failed { reason },
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `crawler` - Timeouts to apply to every request
/// * `user_agent` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use drudge_links::config::Config;
/// use drudge_links::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.crawler, &config.user_agent).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body with a single GET
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | 2xx response | `Fetched(body)` |
/// | Non-2xx response | `Failed("HTTP <status>")` |
/// | Timeout | `Failed("Request timeout")` |
/// | Connection error | `Failed("Connection failed: ...")` |
/// | Body read error | `Failed(<error>)` |
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome<String> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return FetchOutcome::Failed {
            reason: classify_error(&e),
        },
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::Failed {
            reason: format!("HTTP {}", status.as_u16()),
        };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Fetched(body),
        Err(e) => FetchOutcome::Failed {
            reason: classify_error(&e),
        },
    }
}

/// Describes a transport error
fn classify_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    }
}
