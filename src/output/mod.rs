//! Output module for crawl results
//!
//! This module handles:
//! - Streaming link observations to the links CSV as snapshots complete
//! - Tracking and writing the first time each link was seen

mod first_appearances;
mod links;

pub use first_appearances::FirstAppearances;
pub use links::LinkWriter;

use chrono::NaiveDateTime;

/// Layout of every timestamp written to or read from the CSV files
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a timestamp for CSV output
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a timestamp written by [`format_timestamp`]
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input.trim(), TIMESTAMP_FORMAT).ok()
}
