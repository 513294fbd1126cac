use crate::crawler::Archive;
use crate::output::format_timestamp;
use crate::DrudgeError;
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Header of the links CSV
const LINKS_HEADER: [&str; 3] = ["datetime", "link_url", "archive_url"];

/// Streams `datetime,link_url,archive_url` rows to the links CSV
///
/// Rows are flushed after every snapshot so an interrupted crawl keeps what it has
/// already written.
pub struct LinkWriter<W: Write> {
    writer: Writer<W>,
    rows_written: u64,
}

impl LinkWriter<File> {
    /// Creates (or truncates) the links CSV at `path` and writes its header
    pub fn create(path: &Path) -> Result<Self, DrudgeError> {
        let file = File::create(path)?;
        Self::new(file)
    }
}

impl<W: Write> LinkWriter<W> {
    /// Wraps a writer and emits the header
    pub fn new(inner: W) -> Result<Self, DrudgeError> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(LINKS_HEADER)?;
        writer.flush()?;
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Appends one row per link found in `archive` and flushes
    ///
    /// A snapshot without a timestamp gets an empty `datetime` field.
    pub fn write_links(&mut self, archive: &Archive, links: &[String]) -> Result<(), DrudgeError> {
        let datetime = archive
            .timestamp
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default();

        for link in links {
            self.writer
                .write_record([datetime.as_str(), link.as_str(), archive.url.as_str()])?;
            self.rows_written += 1;
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Number of link rows written so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> Result<W, DrudgeError> {
        self.writer.into_inner().map_err(|e| {
            let kind = e.error().kind();
            DrudgeError::Io(std::io::Error::new(kind, e.to_string()))
        })
    }
}
