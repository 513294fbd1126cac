//! Calendar handling for the archive
//!
//! This module turns a requested date range into the days to crawl and each day into the
//! URL of its listing page on the archive.

mod days;
mod source;

pub use days::{days_in_range, parse_day, today};
pub use source::ArchiveSource;
