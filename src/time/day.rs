use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Error raised when a value cannot be read as a `YYYY-MM-DD` calendar day.
#[derive(Debug, thiserror::Error)]
#[error("invalid calendar day '{input}': {source}")]
pub struct DayParseError {
    pub input: String,
    #[source]
    pub source: chrono::ParseError,
}

/// A single calendar day.
///
/// `Day` is a thin wrapper around [`NaiveDate`] that fixes the textual form
/// to `YYYY-MM-DD` and keeps all arithmetic in whole days. Two `Day` values
/// compare as dates, never as instants.
///
/// # Examples
///
/// ```
/// use sitetrack_engine::time::Day;
///
/// let start = Day::parse("2024-02-01").unwrap();
/// let end = start.add_days(13);
/// assert_eq!(end.to_string(), "2024-02-14");
/// assert_eq!(start.days_until(end), 13);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Day(NaiveDate);

impl Day {
    /// Wrap an existing calendar date.
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a `YYYY-MM-DD` string.
    pub fn parse(input: &str) -> Result<Self, DayParseError> {
        NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|source| DayParseError {
                input: input.to_string(),
                source,
            })
    }

    /// Build a day from year/month/day components.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The underlying calendar date.
    pub fn value(&self) -> NaiveDate {
        self.0
    }

    /// This day shifted by a signed number of days.
    pub fn add_days(self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Signed day count from `self` to `other` (positive when `other` is later).
    pub fn days_until(self, other: Day) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// The Monday of the week this day falls in.
    pub fn week_start(self) -> Day {
        let offset = self.0.weekday().num_days_from_monday() as i64;
        self.add_days(-offset)
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Day {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}
