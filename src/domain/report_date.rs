// src/domain/report_date.rs

use crate::errors::{ReportError, ReportResult};
use chrono::{Local, NaiveDate};
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The calendar day a report covers.
///
/// Used verbatim as the capture-time prefix in the query, in the report
/// file name, and in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReportDate(NaiveDate);

impl ReportDate {
    /// Today on the host's local clock.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Accepts only the zero-padded `YYYY-MM-DD` form.
    pub fn parse(raw: &str) -> ReportResult<Self> {
        let raw = raw.trim();
        if raw.len() != 10 {
            return Err(ReportError::Config(format!(
                "Report date must be YYYY-MM-DD, got '{raw}'"
            )));
        }
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Self)
            .map_err(|e| ReportError::Config(format!("Invalid report date '{raw}': {e}")))
    }

    pub fn query_prefix(&self) -> String {
        self.to_string()
    }

    pub fn file_name(&self) -> String {
        format!("config_report_{self}.csv")
    }

    /// Plain string-prefix match, no timezone normalization.
    pub fn covers(&self, capture_time: &str) -> bool {
        capture_time.starts_with(&self.query_prefix())
    }
}

impl fmt::Display for ReportDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl From<NaiveDate> for ReportDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for ReportDate {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
