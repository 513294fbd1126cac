//! Archived snapshots of the front page
//!
//! A snapshot URL ends in the capture time, for example
//! `.../data/2017/01/13/20170113_000211.htm`. That suffix is parsed into the snapshot's
//! timestamp when one is present.

use crate::crawler::fetcher::{fetch_page, FetchOutcome};
use crate::crawler::parser::select_content_links;
use chrono::NaiveDateTime;
use reqwest::Client;

/// Layout of the capture time embedded in snapshot URLs
const SNAPSHOT_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One archived capture of the front page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    /// The snapshot's URL on the archive
    pub url: String,

    /// Capture time, when the URL carries one
    pub timestamp: Option<NaiveDateTime>,
}

impl Archive {
    /// Creates a snapshot reference, parsing the capture time from its URL
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let timestamp = parse_snapshot_time(&url);
        Self { url, timestamp }
    }

    /// Fetches the snapshot and extracts the links in its main content block
    ///
    /// Network and HTTP failures are logged here and returned as
    /// [`FetchOutcome::Failed`]; they never propagate as errors.
    pub async fn fetch_links(&self, client: &Client) -> FetchOutcome<Vec<String>> {
        let outcome = fetch_page(client, &self.url).await;

        if let FetchOutcome::Failed { reason } = &outcome {
            tracing::error!("Failed to fetch snapshot {}: {}", self.url, reason);
        }

        outcome.map(|body| select_content_links(&body))
    }
}

/// Parses the `YYYYMMDD_HHMMSS` capture time that precedes a trailing `.htm`
///
/// Returns `None` when the suffix is missing or is not a valid date and time.
pub fn parse_snapshot_time(url: &str) -> Option<NaiveDateTime> {
    let stem = url.strip_suffix(".htm")?;
    let start = stem
        .char_indices()
        .rev()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '_'))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);

    NaiveDateTime::parse_from_str(&stem[start..], SNAPSHOT_TIME_FORMAT).ok()
}
