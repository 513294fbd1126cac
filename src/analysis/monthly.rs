use crate::analysis::{skip_bad_row, AggregateSummary};
use crate::output::parse_timestamp;
use crate::url::registrable_domain;
use crate::DrudgeError;
use chrono::{Datelike, NaiveDateTime};
use csv::{Reader, Writer};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Columns the monthly breakdown reads from the links CSV; any others are ignored
#[derive(Debug, Deserialize)]
struct LinkRecord {
    datetime: String,
    link_url: String,
}

/// `"{year}-{month}"` without zero padding, e.g. `2017-1`
pub fn month_key(timestamp: &NaiveDateTime) -> String {
    format!("{}-{}", timestamp.year(), timestamp.month())
}

/// Link counts per domain, bucketed by month
#[derive(Debug, Default)]
pub struct MonthlyCounts {
    months: IndexMap<String, IndexMap<String, u64>>,
    rows_read: u64,
    rows_skipped: u64,
}

impl MonthlyCounts {
    /// Count for `domain` in `month`
    pub fn get(&self, month: &str, domain: &str) -> Option<u64> {
        self.months.get(month)?.get(domain).copied()
    }

    /// Number of distinct domains seen in `month`
    pub fn distinct_domains(&self, month: &str) -> usize {
        self.months.get(month).map_or(0, IndexMap::len)
    }

    /// Month keys in first-seen order
    pub fn months(&self) -> impl Iterator<Item = &str> {
        self.months.keys().map(String::as_str)
    }

    /// Number of `(month, domain)` buckets
    pub fn bucket_count(&self) -> usize {
        self.months.values().map(IndexMap::len).sum()
    }

    /// Writes `month,domain,count` for every bucket
    pub fn write_counts<W: Write>(&self, inner: W) -> Result<(), DrudgeError> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(["month", "domain", "count"])?;

        for (month, domains) in &self.months {
            for (domain, count) in domains {
                writer.write_record([month.as_str(), domain.as_str(), count.to_string().as_str()])?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Writes `month,count` with the number of distinct domains per month
    pub fn write_num_domains<W: Write>(&self, inner: W) -> Result<(), DrudgeError> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(["month", "count"])?;

        for (month, domains) in &self.months {
            writer.write_record([month.as_str(), domains.len().to_string().as_str()])?;
        }

        writer.flush()?;
        Ok(())
    }

    fn add(&mut self, month: String, domain: String) {
        *self
            .months
            .entry(month)
            .or_default()
            .entry(domain)
            .or_insert(0) += 1;
    }
}

/// Buckets every row of a links CSV by month and domain
///
/// Rows whose `datetime` is empty or unparseable (snapshots without a capture time) are
/// skipped with a warning.
pub fn count_domains_by_month<R: Read>(input: R) -> Result<MonthlyCounts, DrudgeError> {
    let mut reader = Reader::from_reader(input);
    let mut counts = MonthlyCounts::default();

    for record in reader.deserialize::<LinkRecord>() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                skip_bad_row(e, &mut counts.rows_skipped)?;
                continue;
            }
        };

        let Some(timestamp) = parse_timestamp(&record.datetime) else {
            tracing::warn!(
                "Skipping {} with unusable datetime '{}'",
                record.link_url,
                record.datetime
            );
            counts.rows_skipped += 1;
            continue;
        };

        counts.add(month_key(&timestamp), registrable_domain(&record.link_url));
        counts.rows_read += 1;
    }

    Ok(counts)
}

/// Reads a links CSV and writes both monthly outputs
pub fn count_domains_by_month_files(
    input: &Path,
    counts_output: &Path,
    num_domains_output: &Path,
) -> Result<AggregateSummary, DrudgeError> {
    let counts = count_domains_by_month(File::open(input)?)?;
    counts.write_counts(File::create(counts_output)?)?;
    counts.write_num_domains(File::create(num_domains_output)?)?;

    tracing::info!(
        "Counted {} link(s) over {} month(s) from {} ({} skipped)",
        counts.rows_read,
        counts.months.len(),
        input.display(),
        counts.rows_skipped
    );

    Ok(AggregateSummary {
        rows_read: counts.rows_read,
        rows_skipped: counts.rows_skipped,
        rows_written: counts.bucket_count() as u64,
    })
}
