use crate::DrudgeError;
use chrono::{Local, NaiveDate};

/// Date format accepted on the command line
const DAY_FORMAT: &str = "%Y-%m-%d";

/// Returns every calendar day from `start` to `end`, both inclusive
///
/// An empty vector is returned when `start` is after `end`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use drudge_links::timeline::days_in_range;
///
/// let start = NaiveDate::from_ymd_opt(2017, 2, 27).unwrap();
/// let end = NaiveDate::from_ymd_opt(2017, 3, 1).unwrap();
/// assert_eq!(days_in_range(start, end).len(), 3);
/// ```
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// Parses a `YYYY-MM-DD` day as given on the command line
pub fn parse_day(input: &str) -> Result<NaiveDate, DrudgeError> {
    NaiveDate::parse_from_str(input.trim(), DAY_FORMAT).map_err(|_| DrudgeError::InvalidDate {
        input: input.to_string(),
    })
}

/// The current local calendar day
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
