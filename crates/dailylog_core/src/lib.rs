//! Core domain logic for the daily work log.
//! This crate is the single source of truth for extraction, resolution and
//! aggregation rules.

pub mod config;
pub mod db;
pub mod generation;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, GenerationConfig, Provider};
pub use generation::{GenerationService, HttpGenerationService, ServiceError, ServiceResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::content::DayContent;
pub use model::daily_record::DailyRecord;
pub use model::weekly_report::{WeeklyReport, WeeklyReportValidationError};
pub use pipeline::predict::{Prediction, PredictionComposer, PredictionStatus};
pub use pipeline::resolver::resolve;
pub use pipeline::sections::{extract, Extraction, MARK_TODAY, MARK_TOMORROW};
pub use pipeline::weekly::{AggregateError, WeeklyAggregator};
pub use repo::record_repo::{RecordStore, RepoError, RepoResult, SqliteRecordStore};
pub use service::report_service::{
    DailySubmission, OptimizationStatus, ReportService, ReportServiceError, WeeklyRun,
};
pub use service::schedule::WeeklySchedule;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
