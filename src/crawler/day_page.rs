//! Day listing pages
//!
//! Every day on the archive has one page that links to all snapshots captured that day.

use crate::crawler::archive::Archive;
use crate::crawler::fetcher::{fetch_page, FetchOutcome};
use crate::crawler::parser::select_snapshot_hrefs;
use crate::timeline::ArchiveSource;
use crate::DrudgeError;
use chrono::NaiveDate;
use reqwest::Client;

/// The listing page of one archived day
#[derive(Debug, Clone)]
pub struct DayPage {
    /// The day this page lists
    pub day: NaiveDate,

    /// URL of the listing page
    pub url: String,

    snapshot_prefix: String,
}

impl DayPage {
    /// Builds the page for `day`
    ///
    /// Fails with [`DrudgeError::OutOfRange`] before any network access when the archive
    /// cannot hold `day`.
    pub fn new(source: &ArchiveSource, day: NaiveDate) -> Result<Self, DrudgeError> {
        let url = source.day_url(day)?;
        Ok(Self {
            day,
            url,
            snapshot_prefix: source.snapshot_prefix().to_string(),
        })
    }

    /// Fetches the page and returns one [`Archive`] per snapshot link, in page order
    pub async fn fetch_archives(&self, client: &Client) -> FetchOutcome<Vec<Archive>> {
        let outcome = fetch_page(client, &self.url).await;

        if let FetchOutcome::Failed { reason } = &outcome {
            tracing::error!("Failed to fetch day page for {}: {}", self.day, reason);
        }

        outcome.map(|body| {
            select_snapshot_hrefs(&body, &self.snapshot_prefix)
                .into_iter()
                .map(Archive::new)
                .collect()
        })
    }

    /// Fetches the page and keeps at most `n` evenly spaced snapshots
    ///
    /// `n == 0` keeps every snapshot.
    pub async fn fetch_sampled_archives(
        &self,
        client: &Client,
        n: usize,
    ) -> FetchOutcome<Vec<Archive>> {
        let outcome = self.fetch_archives(client).await;
        if n == 0 {
            return outcome;
        }
        outcome.map(|archives| sample_evenly(archives, n))
    }
}

/// Selects up to `n` items spaced `len / n` apart, starting with the first
///
/// Asking for more items than exist returns all of them.
///
/// # Examples
///
/// ```
/// use drudge_links::crawler::sample_evenly;
///
/// let picked = sample_evenly((0..10).collect(), 3);
/// assert_eq!(picked, vec![0, 3, 6]);
/// ```
pub fn sample_evenly<T>(items: Vec<T>, n: usize) -> Vec<T> {
    if n == 0 || items.is_empty() {
        return items;
    }

    let interval = (items.len() / n).max(1);
    items.into_iter().step_by(interval).take(n).collect()
}
