use crate::analysis::{skip_bad_row, AggregateSummary};
use crate::url::registrable_domain;
use crate::DrudgeError;
use csv::{Reader, Writer};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// The one column the flat count needs from the first-appearances CSV
#[derive(Debug, Deserialize)]
struct FirstAppearanceRecord {
    url: String,
}

/// Number of links per domain, in first-seen order
#[derive(Debug, Default)]
pub struct DomainCounts {
    counts: IndexMap<String, u64>,
    rows_read: u64,
    rows_skipped: u64,
}

impl DomainCounts {
    /// Count for `domain`, if it was seen
    pub fn get(&self, domain: &str) -> Option<u64> {
        self.counts.get(domain).copied()
    }

    /// Domains and counts in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(domain, count)| (domain.as_str(), *count))
    }

    /// Number of distinct domains
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if no domain was counted
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Writes `domain,count` rows
    pub fn write_to<W: Write>(&self, inner: W) -> Result<(), DrudgeError> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(["domain", "count"])?;

        for (domain, count) in &self.counts {
            writer.write_record([domain.as_str(), count.to_string().as_str()])?;
        }

        writer.flush()?;
        Ok(())
    }

    fn add(&mut self, domain: String) {
        *self.counts.entry(domain).or_insert(0) += 1;
    }
}

/// Counts the domain of every `url` in a first-appearances CSV
///
/// Rows missing the `url` column are skipped with a warning.
pub fn count_domains<R: Read>(input: R) -> Result<DomainCounts, DrudgeError> {
    let mut reader = Reader::from_reader(input);
    let mut counts = DomainCounts::default();

    for record in reader.deserialize::<FirstAppearanceRecord>() {
        match record {
            Ok(record) => {
                counts.add(registrable_domain(&record.url));
                counts.rows_read += 1;
            }
            Err(e) => skip_bad_row(e, &mut counts.rows_skipped)?,
        }
    }

    Ok(counts)
}

/// Reads `input` (first appearances) and writes per-domain totals to `output`
pub fn count_domains_file(input: &Path, output: &Path) -> Result<AggregateSummary, DrudgeError> {
    let counts = count_domains(File::open(input)?)?;
    counts.write_to(File::create(output)?)?;

    tracing::info!(
        "Counted {} domain(s) across {} link(s) from {}",
        counts.len(),
        counts.rows_read,
        input.display()
    );

    Ok(AggregateSummary {
        rows_read: counts.rows_read,
        rows_skipped: counts.rows_skipped,
        rows_written: counts.len() as u64,
    })
}
