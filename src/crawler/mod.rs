//! Crawler module for archive page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with explicit success/failure outcomes
//! - Day page listing and per-day sampling
//! - Snapshot link extraction from the main content block
//! - Overall crawl coordination

mod archive;
mod coordinator;
mod day_page;
mod fetcher;
mod parser;

pub use archive::{parse_snapshot_time, Archive};
pub use coordinator::{run_crawl, Coordinator, CrawlPhase, CrawlReport, CrawlRequest};
pub use day_page::{sample_evenly, DayPage};
pub use fetcher::{build_http_client, fetch_page, FetchOutcome};
pub use parser::{select_content_links, select_snapshot_hrefs};
