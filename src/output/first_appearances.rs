use crate::output::format_timestamp;
use crate::DrudgeError;
use chrono::NaiveDateTime;
use csv::Writer;
use indexmap::IndexMap;
use std::io::Write;
use std::path::Path;

/// Header of the first-appearances CSV
const FIRST_APPEARANCES_HEADER: [&str; 2] = ["url", "first_appearance"];

/// Earliest time each link was observed
///
/// Owned by the task that drains crawl results; workers never touch it. Entries keep the
/// order in which links were first recorded.
#[derive(Debug, Default)]
pub struct FirstAppearances {
    seen: IndexMap<String, NaiveDateTime>,
}

impl FirstAppearances {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an observation of `url` at `timestamp`
    ///
    /// The stored time only moves when the new one is strictly earlier, so an exact tie
    /// keeps the observation recorded first.
    ///
    /// # Returns
    ///
    /// `true` if the stored time was inserted or replaced
    pub fn record(&mut self, url: &str, timestamp: NaiveDateTime) -> bool {
        match self.seen.get_mut(url) {
            Some(existing) if timestamp < *existing => {
                *existing = timestamp;
                true
            }
            Some(_) => false,
            None => {
                self.seen.insert(url.to_string(), timestamp);
                true
            }
        }
    }

    /// Earliest recorded time for `url`
    pub fn get(&self, url: &str) -> Option<&NaiveDateTime> {
        self.seen.get(url)
    }

    /// Number of distinct links recorded
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Writes `url,first_appearance` rows, one per distinct link
    pub fn write_to<W: Write>(&self, inner: W) -> Result<(), DrudgeError> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(FIRST_APPEARANCES_HEADER)?;

        for (url, timestamp) in &self.seen {
            writer.write_record([url.as_str(), format_timestamp(timestamp).as_str()])?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Writes the table to a file at `path`, replacing any existing file
    pub fn write_file(&self, path: &Path) -> Result<(), DrudgeError> {
        let file = std::fs::File::create(path)?;
        self.write_to(file)
    }
}
