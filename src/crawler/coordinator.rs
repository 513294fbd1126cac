//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl pipeline that coordinates all aspects of a run:
//! - Validating the requested day range and building day pages
//! - Listing each day's snapshots (sequentially)
//! - Fetching snapshot links concurrently on a bounded pool of tasks
//! - Streaming link rows and tracking first appearances as results arrive
//! - Writing the first-appearances table once every fetch has finished

use crate::config::Config;
use crate::crawler::{build_http_client, Archive, DayPage, FetchOutcome};
use crate::output::{FirstAppearances, LinkWriter};
use crate::timeline::{days_in_range, ArchiveSource};
use crate::DrudgeError;
use chrono::NaiveDate;
use reqwest::Client;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// How often progress is logged at info level
const PROGRESS_INTERVAL: usize = 10;

/// Parameters of one crawl
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    /// First day to crawl
    pub start: NaiveDate,

    /// Last day to crawl (inclusive)
    pub end: NaiveDate,

    /// Snapshots to sample per day; 0 takes every snapshot
    pub per_day: usize,

    /// Path of the links CSV
    pub output: PathBuf,
}

/// Phases a crawl moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Idle,
    Enumerating,
    Fetching,
    Finalizing,
    Done,
}

/// Counters describing a finished crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Day pages requested
    pub days: usize,

    /// Day pages whose fetch failed
    pub day_failures: usize,

    /// Snapshots dispatched for link extraction
    pub snapshots: usize,

    /// Snapshots whose fetch failed
    pub snapshot_failures: usize,

    /// Rows written to the links CSV
    pub rows_written: u64,

    /// Distinct links in the first-appearances table
    pub distinct_urls: usize,
}

/// A finished snapshot fetch, sent from a worker to the coordinator
struct SnapshotResult {
    archive: Archive,
    outcome: FetchOutcome<Vec<String>>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    source: ArchiveSource,
    client: Client,
    phase: CrawlPhase,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(DrudgeError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, DrudgeError> {
        let client = build_http_client(&config.crawler, &config.user_agent)?;
        let source = ArchiveSource::new(&config.source);

        Ok(Self {
            config: Arc::new(config),
            source,
            client,
            phase: CrawlPhase::Idle,
        })
    }

    /// Current phase of the crawl
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Builds the day pages for a range, validating every day before anything is fetched
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<DayPage>)` - One page per day, in order (empty if `start > end`)
    /// * `Err(DrudgeError::OutOfRange)` - A day falls outside the archive's coverage
    pub fn plan(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayPage>, DrudgeError> {
        days_in_range(start, end)
            .into_iter()
            .map(|day| DayPage::new(&self.source, day))
            .collect()
    }

    /// Runs a complete crawl
    ///
    /// 1. Enumerate and validate the day range
    /// 2. List each day's snapshots in turn, sampling when `per_day > 0`
    /// 3. Fetch every snapshot's links with at most `workers` requests in flight,
    ///    writing rows as each snapshot completes
    /// 4. Write the first-appearances table
    ///
    /// A failed day or snapshot fetch contributes nothing and the crawl carries on. Only
    /// range validation and output I/O abort a run.
    pub async fn run(&mut self, request: &CrawlRequest) -> Result<CrawlReport, DrudgeError> {
        let mut report = CrawlReport::default();

        self.transition(CrawlPhase::Enumerating);
        let pages = self.plan(request.start, request.end)?;
        report.days = pages.len();
        tracing::info!(
            "Crawling {} day(s) from {} to {}",
            pages.len(),
            request.start,
            request.end
        );

        let mut writer = LinkWriter::create(&request.output)?;
        let archives = self.list_archives(&pages, request.per_day, &mut report).await;
        report.snapshots = archives.len();

        self.transition(CrawlPhase::Fetching);
        let firsts = self.fetch_all(archives, &mut writer, &mut report).await?;
        report.rows_written = writer.rows_written();
        writer.into_inner()?;

        self.transition(CrawlPhase::Finalizing);
        let firsts_path = Path::new(&self.config.output.first_appearances_path);
        firsts.write_file(firsts_path)?;
        report.distinct_urls = firsts.len();
        tracing::info!(
            "Wrote {} first appearance(s) to {}",
            firsts.len(),
            firsts_path.display()
        );

        self.transition(CrawlPhase::Done);
        tracing::info!(
            "Crawl completed: {} day(s) ({} failed), {} snapshot(s) ({} failed), {} link row(s)",
            report.days,
            report.day_failures,
            report.snapshots,
            report.snapshot_failures,
            report.rows_written
        );

        Ok(report)
    }

    /// Lists the snapshots of every day page, one page at a time
    async fn list_archives(
        &self,
        pages: &[DayPage],
        per_day: usize,
        report: &mut CrawlReport,
    ) -> Vec<Archive> {
        let mut archives = Vec::new();

        for page in pages {
            let outcome = if per_day > 0 {
                page.fetch_sampled_archives(&self.client, per_day).await
            } else {
                page.fetch_archives(&self.client).await
            };

            match outcome {
                FetchOutcome::Fetched(found) => {
                    tracing::debug!("{}: {} snapshot(s)", page.day, found.len());
                    archives.extend(found);
                }
                FetchOutcome::Failed { .. } => {
                    // Already logged at the fetch boundary; the day contributes nothing
                    report.day_failures += 1;
                }
            }
        }

        archives
    }

    /// Fetches links for every snapshot and folds results in completion order
    ///
    /// Workers only fetch and parse. The link writer and the first-appearances map are
    /// touched solely by this task as results come off the channel.
    async fn fetch_all(
        &self,
        archives: Vec<Archive>,
        writer: &mut LinkWriter<File>,
        report: &mut CrawlReport,
    ) -> Result<FirstAppearances, DrudgeError> {
        let total = archives.len();
        let semaphore = Arc::new(Semaphore::new(self.config.crawler.workers as usize));
        let (tx, mut rx) = mpsc::unbounded_channel::<SnapshotResult>();
        let mut handles = Vec::with_capacity(total);

        for archive in archives {
            let semaphore = Arc::clone(&semaphore);
            let client = self.client.clone();
            let tx = tx.clone();

            handles.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let outcome = archive.fetch_links(&client).await;
                // The receiver outlives every worker
                let _ = tx.send(SnapshotResult { archive, outcome });
            }));
        }
        drop(tx);

        let mut firsts = FirstAppearances::new();
        let mut completed = 0;

        while let Some(result) = rx.recv().await {
            completed += 1;

            let links = match result.outcome {
                FetchOutcome::Fetched(links) => links,
                FetchOutcome::Failed { .. } => {
                    report.snapshot_failures += 1;
                    Vec::new()
                }
            };

            writer.write_links(&result.archive, &links)?;

            if let Some(timestamp) = result.archive.timestamp {
                for link in &links {
                    firsts.record(link, timestamp);
                }
            }

            tracing::debug!(
                "[{}/{}] {}: {} link(s)",
                completed,
                total,
                result.archive.url,
                links.len()
            );
            if completed % PROGRESS_INTERVAL == 0 || completed == total {
                tracing::info!("Progress: {}/{} snapshots fetched", completed, total);
            }
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("Snapshot worker did not finish: {}", e);
                report.snapshot_failures += 1;
            }
        }

        Ok(firsts)
    }

    fn transition(&mut self, next: CrawlPhase) {
        tracing::debug!("Crawl phase: {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}

/// Runs a crawl with a fresh coordinator
///
/// # Example
///
/// ```no_run
/// use drudge_links::config::Config;
/// use drudge_links::crawler::{run_crawl, CrawlRequest};
/// use drudge_links::timeline::parse_day;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let request = CrawlRequest {
///     start: parse_day("2017-01-13")?,
///     end: parse_day("2017-01-14")?,
///     per_day: 2,
///     output: "all_links.csv".into(),
/// };
/// let report = run_crawl(Config::default(), &request).await?;
/// println!("{} rows", report.rows_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, request: &CrawlRequest) -> Result<CrawlReport, DrudgeError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run(request).await
}
