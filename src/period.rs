//! Date ranges for alert queries and their human-readable labels.
//!
//! A period travels as `begin,end` (two calendar dates). When the caller
//! leaves it out, the range defaults to yesterday→today in UTC.

use chrono::{NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::AlertsError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    begin: NaiveDate,
    end: NaiveDate,
}

impl Period {
    pub fn new(begin: NaiveDate, end: NaiveDate) -> Self {
        Self { begin, end }
    }

    /// The one-day range ending on `today`.
    pub fn ending_on(today: NaiveDate) -> Self {
        let yesterday = today.pred_opt().unwrap_or(today);
        Self::new(yesterday, today)
    }

    /// Yesterday→today, taken from the UTC calendar so the result does not
    /// depend on the host timezone or the time of day.
    pub fn default_period() -> Self {
        Self::ending_on(Utc::now().date_naive())
    }

    /// Uses `raw` when it is present and non-blank, otherwise the default
    /// period.
    pub fn resolve(raw: Option<&str>) -> Result<Self, AlertsError> {
        match raw.map(str::trim) {
            Some(s) if !s.is_empty() => s.parse(),
            _ => Ok(Self::default_period()),
        }
    }

    pub fn begin(&self) -> NaiveDate {
        self.begin
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn begin_str(&self) -> String {
        self.begin.format(DATE_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }

    /// Whole days from `begin` to `end`; negative when the range is reversed.
    pub fn days(&self) -> i64 {
        (self.end - self.begin).num_days()
    }

    pub fn label(&self) -> &'static str {
        period_label(self.days())
    }
}

/// Maps a day span onto the label shown next to alert counts.
///
/// | Days        | Label           |
/// |-------------|-----------------|
/// | 1           | Past 24 hours   |
/// | 2           | Past 48 hours   |
/// | 3           | Past 72 hours   |
/// | anything else | Past week     |
pub fn period_label(days: i64) -> &'static str {
    match days {
        1 => "Past 24 hours",
        2 => "Past 48 hours",
        3 => "Past 72 hours",
        _ => "Past week",
    }
}

impl FromStr for Period {
    type Err = AlertsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let (Some(begin), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(AlertsError::invalid(format!(
                "period must be two comma-separated dates, got '{s}'"
            )));
        };
        Ok(Self::new(parse_date(begin)?, parse_date(end)?))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, AlertsError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| AlertsError::invalid(format!("invalid date '{}' in period", raw.trim())))
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.begin_str(), self.end_str())
    }
}
