//! Weekly report domain model.
//!
//! # Invariants
//! - At most one report exists per `(week_start, week_end)` pair.
//! - `week_end` must not be earlier than `week_start`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Generated summary for one aggregation window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyReport {
    /// First date of the window (inclusive).
    pub week_start: NaiveDate,
    /// Last date of the window (inclusive).
    pub week_end: NaiveDate,
    /// Generated text, stored verbatim.
    pub report: String,
}

/// Validation failures for weekly report windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeeklyReportValidationError {
    InvertedWindow {
        week_start: NaiveDate,
        week_end: NaiveDate,
    },
}

impl Display for WeeklyReportValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvertedWindow {
                week_start,
                week_end,
            } => write!(
                f,
                "week_end {week_end} is earlier than week_start {week_start}"
            ),
        }
    }
}

impl Error for WeeklyReportValidationError {}

impl WeeklyReport {
    pub fn new(week_start: NaiveDate, week_end: NaiveDate, report: impl Into<String>) -> Self {
        Self {
            week_start,
            week_end,
            report: report.into(),
        }
    }

    /// Checks window ordering before persistence.
    pub fn validate(&self) -> Result<(), WeeklyReportValidationError> {
        if self.week_end < self.week_start {
            return Err(WeeklyReportValidationError::InvertedWindow {
                week_start: self.week_start,
                week_end: self.week_end,
            });
        }
        Ok(())
    }
}
