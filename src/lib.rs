//! drudge-links: outbound link history for the Drudge Report Archives
//!
//! This crate walks a range of days on the archive, pulls the outbound links out of every
//! archived front page, records when each link first appeared, and aggregates the results
//! by domain and by month.

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod output;
pub mod timeline;
pub mod url;

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for drudge-links operations
#[derive(Debug, Error)]
pub enum DrudgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Given date out of range: {day} (archive covers {first} to {last})")]
    OutOfRange {
        day: NaiveDate,
        first: NaiveDate,
        last: NaiveDate,
    },

    #[error("Invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for drudge-links operations
pub type Result<T> = std::result::Result<T, DrudgeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Archive, Coordinator, CrawlReport, CrawlRequest, DayPage, FetchOutcome};
pub use timeline::{days_in_range, parse_day, ArchiveSource};
pub use crate::url::registrable_domain;
