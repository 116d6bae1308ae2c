//! Weekly roll-up of daily records.
//!
//! # Invariants
//! - An empty window fails with `EmptyWindow` before any generation call or
//!   store write.
//! - Records are numbered 1..n in ascending date order.
//! - The generated text is stored verbatim; no section extraction applies.
//! - Nothing is persisted when generation fails.

use crate::generation::{GenerationService, ServiceError};
use crate::model::daily_record::DailyRecord;
use crate::model::weekly_report::WeeklyReport;
use crate::pipeline::prompt::{day_block, format_rules, output_template};
use crate::pipeline::resolver::resolve;
use crate::pipeline::sections::WEEKLY_MARKERS;
use crate::repo::record_repo::{RecordStore, RepoError};
use chrono::NaiveDate;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AggregateResult<T> = Result<T, AggregateError>;

/// Weekly aggregation failure.
#[derive(Debug)]
pub enum AggregateError {
    /// No records in the window; no report produced.
    EmptyWindow {
        window_start: NaiveDate,
        window_end: NaiveDate,
    },
    /// `window_end` is earlier than `window_start`.
    InvertedWindow {
        window_start: NaiveDate,
        window_end: NaiveDate,
    },
    /// A supplied record is dated outside the window.
    RecordOutsideWindow(NaiveDate),
    /// Generation failed; nothing was persisted.
    Service(ServiceError),
    /// Persisting the report failed.
    Repo(RepoError),
}

impl Display for AggregateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWindow {
                window_start,
                window_end,
            } => write!(f, "no daily records between {window_start} and {window_end}"),
            Self::InvertedWindow {
                window_start,
                window_end,
            } => write!(
                f,
                "window end {window_end} is earlier than start {window_start}"
            ),
            Self::RecordOutsideWindow(date) => {
                write!(f, "daily record {date} lies outside the aggregation window")
            }
            Self::Service(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AggregateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ServiceError> for AggregateError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RepoError> for AggregateError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Builds weekly reports from daily records and persists them.
pub struct WeeklyAggregator<G: GenerationService, S: RecordStore> {
    generation: G,
    store: S,
}

impl<G: GenerationService, S: RecordStore> WeeklyAggregator<G, S> {
    pub fn new(generation: G, store: S) -> Self {
        Self { generation, store }
    }

    /// Summarizes `records` of `[window_start, window_end]` into one report.
    ///
    /// Duplicate-window checks are the caller's job; the store rejects a
    /// second insert for the same window with `RepoError::DuplicateWeeklyReport`.
    ///
    /// # Errors
    /// - `EmptyWindow` when `records` is empty.
    /// - `InvertedWindow` / `RecordOutsideWindow` for inconsistent input.
    /// - `Service` when generation fails, `Repo` when persistence fails.
    pub fn aggregate(
        &self,
        window_start: NaiveDate,
        window_end: NaiveDate,
        records: &[DailyRecord],
    ) -> AggregateResult<WeeklyReport> {
        if window_end < window_start {
            return Err(AggregateError::InvertedWindow {
                window_start,
                window_end,
            });
        }
        if records.is_empty() {
            warn!(
                "event=weekly_aggregate module=pipeline status=error error_code=empty_window start={} end={}",
                window_start, window_end
            );
            return Err(AggregateError::EmptyWindow {
                window_start,
                window_end,
            });
        }
        if let Some(outside) = records
            .iter()
            .find(|record| record.date < window_start || record.date > window_end)
        {
            return Err(AggregateError::RecordOutsideWindow(outside.date));
        }

        let mut ordered: Vec<&DailyRecord> = records.iter().collect();
        ordered.sort_by_key(|record| record.date);

        let prompt = weekly_prompt(&ordered);
        let text = self.generation.complete(&prompt).map_err(|err| {
            warn!(
                "event=weekly_aggregate module=pipeline status=error error_code={} start={} end={}",
                err.code(),
                window_start,
                window_end
            );
            err
        })?;

        let report = WeeklyReport::new(window_start, window_end, text);
        if let Err(err) = self.store.insert_weekly_report(&report) {
            error!(
                "event=weekly_aggregate module=pipeline status=error error_code=report_persist_failed start={} end={} error={}",
                window_start, window_end, err
            );
            return Err(err.into());
        }

        info!(
            "event=weekly_aggregate module=pipeline status=ok start={} end={} days={} report_chars={}",
            window_start,
            window_end,
            ordered.len(),
            report.report.chars().count()
        );
        Ok(report)
    }
}

/// Builds the weekly summary prompt; `records` must be in ascending date order.
pub fn weekly_prompt(records: &[&DailyRecord]) -> String {
    let mut summaries = String::new();
    for (index, record) in records.iter().enumerate() {
        summaries.push_str(&day_block(&format!("第{}天", index + 1), &resolve(record)));
        summaries.push('\n');
    }

    format!(
        "请根据以下{}天的日报内容，生成一份周报，格式如下：\n{}\n\n{}\n\n日报内容：\n{}",
        records.len(),
        output_template(WEEKLY_MARKERS),
        format_rules(WEEKLY_MARKERS),
        summaries
    )
}
