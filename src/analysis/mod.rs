//! Aggregation over crawl output
//!
//! This module reads the CSV files a crawl produces and counts the domains links point
//! at, either in total or broken down by calendar month. Both jobs read their whole input
//! once and write their output once; counts keep the order in which keys first appeared.

mod domains;
mod monthly;

pub use domains::{count_domains, count_domains_file, DomainCounts};
pub use monthly::{count_domains_by_month, count_domains_by_month_files, month_key, MonthlyCounts};

use crate::DrudgeError;

/// Row counts for one aggregation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateSummary {
    /// Input rows that were counted
    pub rows_read: u64,

    /// Input rows that could not be used
    pub rows_skipped: u64,

    /// Rows written to the primary output
    pub rows_written: u64,
}

/// Sorts a CSV row error into fatal I/O failures and skippable bad rows
///
/// Returns the error back when it must abort the job.
fn skip_bad_row(error: csv::Error, skipped: &mut u64) -> Result<(), DrudgeError> {
    if error.is_io_error() {
        return Err(error.into());
    }

    tracing::warn!("Skipping unreadable row: {}", error);
    *skipped += 1;
    Ok(())
}
