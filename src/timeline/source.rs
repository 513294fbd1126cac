use crate::config::SourceConfig;
use crate::timeline::today;
use crate::DrudgeError;
use chrono::{Datelike, NaiveDate};

/// The archive site: where its pages live and which days it covers
#[derive(Debug, Clone)]
pub struct ArchiveSource {
    base_url: String,
    snapshot_prefix: String,
    first_date: NaiveDate,
}

impl ArchiveSource {
    /// Builds a source from configuration
    pub fn new(config: &SourceConfig) -> Self {
        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            base_url,
            snapshot_prefix: config.snapshot_prefix.clone(),
            first_date: config.first_date,
        }
    }

    /// Prefix that marks snapshot links on a day page
    pub fn snapshot_prefix(&self) -> &str {
        &self.snapshot_prefix
    }

    /// Earliest day the archive holds
    pub fn first_date(&self) -> NaiveDate {
        self.first_date
    }

    /// URL of the archive's timeline page
    pub fn timeline_url(&self) -> String {
        format!("{}dsp/timeline_html.htm", self.base_url)
    }

    /// Builds the listing URL for `day`, rejecting days the archive cannot hold
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - URL of the day page
    /// * `Err(DrudgeError::OutOfRange)` - `day` is before the first archived day or
    ///   after today
    pub fn day_url(&self, day: NaiveDate) -> Result<String, DrudgeError> {
        self.day_url_as_of(day, today())
    }

    /// Same as [`ArchiveSource::day_url`] with an explicit current day
    pub fn day_url_as_of(&self, day: NaiveDate, today: NaiveDate) -> Result<String, DrudgeError> {
        if day < self.first_date || day > today {
            return Err(DrudgeError::OutOfRange {
                day,
                first: self.first_date,
                last: today,
            });
        }

        Ok(format!(
            "{}data/{}/{:02}/{:02}/index.htm?s=flag",
            self.base_url,
            day.year(),
            day.month(),
            day.day()
        ))
    }
}

impl Default for ArchiveSource {
    fn default() -> Self {
        Self::new(&SourceConfig::default())
    }
}
