//! Daily record / weekly report store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the keyed record-store APIs consumed by pipeline and services.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Dates are persisted as `YYYY-MM-DD` text; range queries rely on it.
//! - `upsert_daily_record` overwrites all content fields of a date at once.
//! - Read paths reject unparseable persisted dates instead of masking them.

use crate::db::DbError;
use crate::model::daily_record::DailyRecord;
use crate::model::weekly_report::{WeeklyReport, WeeklyReportValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DATE_FORMAT: &str = "%Y-%m-%d";

const DAILY_SELECT_SQL: &str = "SELECT
    date,
    original_today,
    original_tomorrow,
    optimized_raw,
    optimized_today,
    optimized_tomorrow
FROM daily_records";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(WeeklyReportValidationError),
    Db(DbError),
    DuplicateWeeklyReport {
        week_start: NaiveDate,
        week_end: NaiveDate,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateWeeklyReport {
                week_start,
                week_end,
            } => write!(
                f,
                "weekly report already exists for {week_start}..{week_end}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateWeeklyReport { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<WeeklyReportValidationError> for RepoError {
    fn from(value: WeeklyReportValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Keyed store for daily records and weekly reports.
pub trait RecordStore {
    /// Gets the record for one date.
    fn get_by_date(&self, date: NaiveDate) -> RepoResult<Option<DailyRecord>>;
    /// Inserts or fully overwrites the record for `record.date`.
    fn upsert_daily_record(&self, record: &DailyRecord) -> RepoResult<()>;
    /// Lists records in `[start, end]`, ascending by date.
    fn get_range(&self, start: NaiveDate, end: NaiveDate) -> RepoResult<Vec<DailyRecord>>;
    /// Lists up to `limit` records strictly before `date`, descending by date.
    fn get_most_recent_before(&self, date: NaiveDate, limit: u32)
        -> RepoResult<Vec<DailyRecord>>;
    /// Gets the report for one exact window.
    fn get_weekly_report(
        &self,
        week_start: NaiveDate,
        week_end: NaiveDate,
    ) -> RepoResult<Option<WeeklyReport>>;
    /// Inserts a report; fails with `DuplicateWeeklyReport` when the window exists.
    fn insert_weekly_report(&self, report: &WeeklyReport) -> RepoResult<()>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn get_by_date(&self, date: NaiveDate) -> RepoResult<Option<DailyRecord>> {
        (**self).get_by_date(date)
    }

    fn upsert_daily_record(&self, record: &DailyRecord) -> RepoResult<()> {
        (**self).upsert_daily_record(record)
    }

    fn get_range(&self, start: NaiveDate, end: NaiveDate) -> RepoResult<Vec<DailyRecord>> {
        (**self).get_range(start, end)
    }

    fn get_most_recent_before(
        &self,
        date: NaiveDate,
        limit: u32,
    ) -> RepoResult<Vec<DailyRecord>> {
        (**self).get_most_recent_before(date, limit)
    }

    fn get_weekly_report(
        &self,
        week_start: NaiveDate,
        week_end: NaiveDate,
    ) -> RepoResult<Option<WeeklyReport>> {
        (**self).get_weekly_report(week_start, week_end)
    }

    fn insert_weekly_report(&self, report: &WeeklyReport) -> RepoResult<()> {
        (**self).insert_weekly_report(report)
    }
}

/// SQLite-backed record store.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_daily(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<DailyRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_daily_row(row)?);
        }

        Ok(records)
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn get_by_date(&self, date: NaiveDate) -> RepoResult<Option<DailyRecord>> {
        let mut records = self.query_daily(
            &format!("{DAILY_SELECT_SQL} WHERE date = ?1;"),
            params![date_to_db(date)],
        )?;
        Ok(records.pop())
    }

    fn upsert_daily_record(&self, record: &DailyRecord) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO daily_records (
                date,
                original_today,
                original_tomorrow,
                optimized_raw,
                optimized_today,
                optimized_tomorrow
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(date) DO UPDATE SET
                original_today = excluded.original_today,
                original_tomorrow = excluded.original_tomorrow,
                optimized_raw = excluded.optimized_raw,
                optimized_today = excluded.optimized_today,
                optimized_tomorrow = excluded.optimized_tomorrow,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                date_to_db(record.date),
                record.original_today.as_str(),
                record.original_tomorrow.as_str(),
                record.optimized_raw.as_deref(),
                record.optimized_today.as_str(),
                record.optimized_tomorrow.as_str(),
            ],
        )?;

        Ok(())
    }

    fn get_range(&self, start: NaiveDate, end: NaiveDate) -> RepoResult<Vec<DailyRecord>> {
        self.query_daily(
            &format!("{DAILY_SELECT_SQL} WHERE date BETWEEN ?1 AND ?2 ORDER BY date ASC;"),
            params![date_to_db(start), date_to_db(end)],
        )
    }

    fn get_most_recent_before(
        &self,
        date: NaiveDate,
        limit: u32,
    ) -> RepoResult<Vec<DailyRecord>> {
        self.query_daily(
            &format!("{DAILY_SELECT_SQL} WHERE date < ?1 ORDER BY date DESC LIMIT ?2;"),
            params![date_to_db(date), i64::from(limit)],
        )
    }

    fn get_weekly_report(
        &self,
        week_start: NaiveDate,
        week_end: NaiveDate,
    ) -> RepoResult<Option<WeeklyReport>> {
        let mut stmt = self.conn.prepare(
            "SELECT week_start, week_end, report
             FROM weekly_reports
             WHERE week_start = ?1 AND week_end = ?2;",
        )?;

        let mut rows = stmt.query(params![date_to_db(week_start), date_to_db(week_end)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_weekly_row(row)?));
        }

        Ok(None)
    }

    fn insert_weekly_report(&self, report: &WeeklyReport) -> RepoResult<()> {
        report.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO weekly_reports (week_start, week_end, report) VALUES (?1, ?2, ?3);",
            params![
                date_to_db(report.week_start),
                date_to_db(report.week_end),
                report.report.as_str(),
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(RepoError::DuplicateWeeklyReport {
                    week_start: report.week_start,
                    week_end: report.week_end,
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn parse_daily_row(row: &Row<'_>) -> RepoResult<DailyRecord> {
    let date_text: String = row.get("date")?;
    Ok(DailyRecord {
        date: parse_date(&date_text, "daily_records.date")?,
        original_today: row.get("original_today")?,
        original_tomorrow: row.get("original_tomorrow")?,
        optimized_raw: row.get("optimized_raw")?,
        optimized_today: row.get("optimized_today")?,
        optimized_tomorrow: row.get("optimized_tomorrow")?,
    })
}

fn parse_weekly_row(row: &Row<'_>) -> RepoResult<WeeklyReport> {
    let start_text: String = row.get("week_start")?;
    let end_text: String = row.get("week_end")?;
    let report = WeeklyReport {
        week_start: parse_date(&start_text, "weekly_reports.week_start")?,
        week_end: parse_date(&end_text, "weekly_reports.week_end")?,
        report: row.get("report")?,
    };
    report.validate()?;
    Ok(report)
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}
