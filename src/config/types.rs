use chrono::NaiveDate;
use serde::Deserialize;

/// Main configuration structure for drudge-links
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Location and coverage of the upstream archive
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Root of the archive site; day and timeline URLs are built beneath it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Prefix an href must carry to count as a snapshot link on a day page
    #[serde(rename = "snapshot-prefix")]
    pub snapshot_prefix: String,

    /// Earliest day the archive holds
    #[serde(rename = "first-date")]
    pub first_date: NaiveDate,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www.drudgereportarchives.com/".to_string(),
            // The archive links its snapshots with this exact casing
            snapshot_prefix: "http://www.drudgereportArchives.com/data".to_string(),
            first_date: NaiveDate::from_ymd_opt(2001, 11, 18).unwrap_or(NaiveDate::MIN),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of snapshot pages fetched concurrently
    pub workers: u32,

    /// Whole-request timeout in seconds
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Connection timeout in seconds
    #[serde(rename = "connect-timeout")]
    pub connect_timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            request_timeout: 30,
            connect_timeout: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value sent with every request
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// File names read and written by the crawl and aggregation commands
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    #[serde(rename = "first-appearances-path")]
    pub first_appearances_path: String,

    /// Links CSV read by the monthly aggregation
    #[serde(rename = "all-links-path")]
    pub all_links_path: String,

    #[serde(rename = "domain-counts-path")]
    pub domain_counts_path: String,

    #[serde(rename = "domain-counts-by-month-path")]
    pub domain_counts_by_month_path: String,

    #[serde(rename = "num-domains-by-month-path")]
    pub num_domains_by_month_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            first_appearances_path: "first_appearances.csv".to_string(),
            all_links_path: "all_links.csv".to_string(),
            domain_counts_path: "domain_counts.csv".to_string(),
            domain_counts_by_month_path: "domain_counts_by_month.csv".to_string(),
            num_domains_by_month_path: "num_domains_by_month.csv".to_string(),
        }
    }
}
