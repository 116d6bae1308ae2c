//! Daily / weekly report use-case service.
//!
//! # Responsibility
//! - Turn raw daily input into a persisted, optimized daily record.
//! - Serve resolved content and next-day predictions.
//! - Run weekly roll-ups with a caller-side duplicate-window check.
//!
//! # Invariants
//! - A daily record is upserted only after all derived fields are computed;
//!   a failed generation call stores the raw input with no optimized fields.
//! - Each operation performs at most one generation call.
//! - An existing weekly report for the same window is never regenerated.

use crate::generation::{GenerationService, ServiceError};
use crate::model::content::DayContent;
use crate::model::daily_record::DailyRecord;
use crate::model::weekly_report::WeeklyReport;
use crate::pipeline::predict::{Prediction, PredictionComposer, PREDICTION_HISTORY_LIMIT};
use crate::pipeline::prompt::optimization_prompt;
use crate::pipeline::resolver::resolve;
use crate::pipeline::sections::{extract, Extraction};
use crate::pipeline::weekly::{AggregateError, WeeklyAggregator};
use crate::repo::record_repo::{RecordStore, RepoError, RepoResult};
use crate::service::schedule::WeeklySchedule;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for report use-cases.
#[derive(Debug)]
pub enum ReportServiceError {
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Weekly aggregation failure (including `EmptyWindow`).
    Aggregate(AggregateError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ReportServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Aggregate(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent record state: {details}"),
        }
    }
}

impl Error for ReportServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Aggregate(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<RepoError> for ReportServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<AggregateError> for ReportServiceError {
    fn from(value: AggregateError) -> Self {
        match value {
            AggregateError::Repo(err) => Self::Repo(err),
            other => Self::Aggregate(other),
        }
    }
}

/// How the optimization step of a daily submission went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptimizationStatus {
    /// Generated text carried both section markers.
    Structured,
    /// Generated text was stored but lacked well-formed markers.
    Unstructured,
    /// Generation failed; the record keeps raw input only.
    ServiceFailed(ServiceError),
}

/// Result envelope of one daily submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySubmission {
    /// Record as read back from the store.
    pub record: DailyRecord,
    /// Resolved content for display.
    pub resolved: DayContent,
    pub optimization: OptimizationStatus,
}

/// Outcome of a weekly run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeeklyRun {
    /// The day is not the designated roll-up day.
    NotScheduled,
    /// A report for this window already exists; generation was skipped.
    AlreadyExists(WeeklyReport),
    /// A new report was generated and persisted.
    Created(WeeklyReport),
}

/// Report service facade over a record store and a generation backend.
pub struct ReportService<S: RecordStore, G: GenerationService> {
    store: S,
    generation: G,
}

impl<S: RecordStore, G: GenerationService> ReportService<S, G> {
    pub fn new(store: S, generation: G) -> Self {
        Self { store, generation }
    }

    /// Optimizes and persists one day's raw input.
    ///
    /// # Contract
    /// - Generation failure degrades to a raw-only record
    ///   (`optimized_raw = None`) and is reported via `optimization`.
    /// - Re-submitting the same date overwrites all content fields.
    pub fn submit_daily(
        &self,
        date: NaiveDate,
        original_today: impl Into<String>,
        original_tomorrow: impl Into<String>,
    ) -> Result<DailySubmission, ReportServiceError> {
        let mut record = DailyRecord::new(date, original_today, original_tomorrow);

        let prompt = optimization_prompt(&record.original_today, &record.original_tomorrow);
        let optimization = match self.generation.complete(&prompt) {
            Ok(raw) => {
                let extraction = extract(&raw);
                let status = if extraction.is_match() {
                    OptimizationStatus::Structured
                } else {
                    warn!(
                        "event=daily_submit module=service status=degraded reason=extraction_miss date={} reply_chars={}",
                        date,
                        raw.chars().count()
                    );
                    OptimizationStatus::Unstructured
                };
                let sections = extraction.into_content();
                record.optimized_today = sections.today;
                record.optimized_tomorrow = sections.tomorrow;
                record.optimized_raw = Some(raw);
                status
            }
            Err(err) => {
                warn!(
                    "event=daily_submit module=service status=degraded error_code={} date={}",
                    err.code(),
                    date
                );
                OptimizationStatus::ServiceFailed(err)
            }
        };

        self.store.upsert_daily_record(&record)?;
        let stored = self
            .store
            .get_by_date(date)?
            .ok_or(ReportServiceError::InconsistentState(
                "submitted daily record not found in read-back",
            ))?;

        info!(
            "event=daily_submit module=service status=ok date={} optimized={}",
            date,
            stored.has_optimization()
        );

        Ok(DailySubmission {
            resolved: resolve(&stored),
            record: stored,
            optimization,
        })
    }

    /// Gets one daily record as stored.
    pub fn get_daily(&self, date: NaiveDate) -> RepoResult<Option<DailyRecord>> {
        self.store.get_by_date(date)
    }

    /// Resolves the authoritative content of one date.
    pub fn resolve_day(&self, date: NaiveDate) -> RepoResult<Option<DayContent>> {
        Ok(self.store.get_by_date(date)?.as_ref().map(resolve))
    }

    /// Predicts the content of `date` from the records preceding it.
    pub fn predict_for(&self, date: NaiveDate) -> RepoResult<Prediction> {
        let history = self
            .store
            .get_most_recent_before(date, PREDICTION_HISTORY_LIMIT as u32)?;
        Ok(PredictionComposer::new(&self.generation).predict_next(&history))
    }

    /// Generates the report of an explicit window unless one exists.
    ///
    /// # Errors
    /// - `Aggregate(EmptyWindow)` when no daily records fall in the window.
    /// - `Aggregate(Service)` when generation fails; nothing is persisted.
    pub fn generate_weekly(
        &self,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<WeeklyRun, ReportServiceError> {
        if let Some(existing) = self.store.get_weekly_report(window_start, window_end)? {
            info!(
                "event=weekly_run module=service status=skipped reason=already_exists start={} end={}",
                window_start, window_end
            );
            return Ok(WeeklyRun::AlreadyExists(existing));
        }

        let records = self.store.get_range(window_start, window_end)?;
        let report = WeeklyAggregator::new(&self.generation, &self.store).aggregate(
            window_start,
            window_end,
            &records,
        )?;
        Ok(WeeklyRun::Created(report))
    }

    /// Applies `schedule` to `today` and runs the roll-up when due.
    pub fn run_weekly(
        &self,
        today: NaiveDate,
        schedule: &WeeklySchedule,
    ) -> Result<WeeklyRun, ReportServiceError> {
        match schedule.window_for(today) {
            Some((window_start, window_end)) => self.generate_weekly(window_start, window_end),
            None => {
                info!(
                    "event=weekly_run module=service status=skipped reason=not_scheduled date={}",
                    today
                );
                Ok(WeeklyRun::NotScheduled)
            }
        }
    }

    /// Gets the stored report of one window.
    pub fn get_weekly(
        &self,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> RepoResult<Option<WeeklyReport>> {
        self.store.get_weekly_report(window_start, window_end)
    }
}
