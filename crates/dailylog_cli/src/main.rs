//! Command-line boundary for the daily log.
//!
//! # Responsibility
//! - Map command-line arguments onto `ReportService` calls.
//! - Print resolved strings; hold no pipeline logic of its own.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use dailylog_core::db::open_db;
use dailylog_core::{
    init_logging, AppConfig, GenerationConfig, HttpGenerationService, OptimizationStatus,
    PredictionStatus, ReportService, SqliteRecordStore, WeeklyRun, WeeklySchedule,
};
use log::info;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "dailylog", version, about = "Daily work log with weekly roll-ups")]
struct Args {
    /// SQLite database path (overrides DAILYLOG_DB).
    #[arg(long)]
    db: Option<PathBuf>,

    /// Absolute log directory (overrides DAILYLOG_LOG_DIR).
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides DAILYLOG_LOG_LEVEL).
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Polish and store one day's entry.
    Daily {
        /// Today's progress, free text.
        #[arg(long, default_value = "")]
        today: String,
        /// Tomorrow's plan, free text.
        #[arg(long, default_value = "")]
        tomorrow: String,
        /// Entry date (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print the resolved content of one day.
    Show {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Predict a day's content from the three preceding entries.
    Predict {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Generate the weekly report when due, or for an explicit window.
    Weekly {
        /// Trigger day; the report runs only when it is a Friday.
        #[arg(long, conflicts_with_all = ["start", "end"])]
        date: Option<NaiveDate>,
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
    },
}

fn main() -> anyhow::Result<()> {
    run(Args::parse())
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env();
    if let Some(db) = args.db {
        config.db_path = db;
    }
    if let Some(log_dir) = args.log_dir {
        config.log_dir = Some(log_dir);
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)
            .with_context(|| format!("initializing logging in {}", log_dir.display()))?;
    }

    let conn = open_store(&config.db_path)?;
    let store = SqliteRecordStore::new(&conn);
    let today = Local::now().date_naive();
    info!(
        "event=cli_command module=cli status=start command={}",
        args.command.name()
    );

    match args.command {
        Command::Show { date } => {
            let date = date.unwrap_or(today);
            // Read-only: no generation credentials needed.
            let service = ReportService::new(store, Offline);
            let resolved = service
                .resolve_day(date)
                .with_context(|| format!("reading entry for {date}"))?;
            match resolved {
                Some(content) => print_day(date, &content.today, &content.tomorrow),
                None => println!("{date}: no entry"),
            }
        }
        Command::Daily {
            today: progress,
            tomorrow: plan,
            date,
        } => {
            let service = ReportService::new(store, http_generation()?);
            let date = date.unwrap_or(today);
            let submission = service
                .submit_daily(date, progress, plan)
                .with_context(|| format!("submitting entry for {date}"))?;
            match &submission.optimization {
                OptimizationStatus::Structured => {}
                OptimizationStatus::Unstructured => {
                    eprintln!("warning: reply had no section markers; raw input kept")
                }
                OptimizationStatus::ServiceFailed(err) => {
                    eprintln!("warning: optimization failed ({err}); raw input kept")
                }
            }
            if let Some(raw) = &submission.record.optimized_raw {
                println!("{raw}\n");
            }
            print_day(
                submission.record.date,
                &submission.resolved.today,
                &submission.resolved.tomorrow,
            );
        }
        Command::Predict { date } => {
            let date = date.unwrap_or(today);
            let service = ReportService::new(store, http_generation()?);
            let prediction = service
                .predict_for(date)
                .with_context(|| format!("predicting entry for {date}"))?;
            match &prediction.status {
                PredictionStatus::NoHistory => println!("{date}: no earlier entries to predict from"),
                PredictionStatus::ServiceFailed(err) => eprintln!("warning: prediction failed ({err})"),
                PredictionStatus::Unstructured => eprintln!("warning: reply had no section markers"),
                PredictionStatus::Predicted => print_day(
                    date,
                    &prediction.content.today,
                    &prediction.content.tomorrow,
                ),
            }
        }
        Command::Weekly { date, start, end } => {
            let service = ReportService::new(store, http_generation()?);
            let run = match (start, end) {
                (Some(start), Some(end)) => service
                    .generate_weekly(start, end)
                    .with_context(|| format!("generating weekly report for {start}..{end}"))?,
                _ => {
                    let date = date.unwrap_or(today);
                    service
                        .run_weekly(date, &WeeklySchedule::default())
                        .with_context(|| format!("running weekly report for {date}"))?
                }
            };
            match run {
                WeeklyRun::NotScheduled => println!("weekly report runs on Fridays only"),
                WeeklyRun::AlreadyExists(report) => {
                    println!(
                        "report for {}..{} already exists:\n\n{}",
                        report.week_start, report.week_end, report.report
                    );
                }
                WeeklyRun::Created(report) => {
                    println!(
                        "report for {}..{}:\n\n{}",
                        report.week_start, report.week_end, report.report
                    );
                }
            }
        }
    }

    Ok(())
}

fn open_store(path: &Path) -> anyhow::Result<Connection> {
    open_db(path).with_context(|| format!("opening database {}", path.display()))
}

fn http_generation() -> anyhow::Result<HttpGenerationService> {
    generation_from(GenerationConfig::from_env())
}

fn generation_from(
    config: Result<GenerationConfig, dailylog_core::ConfigError>,
) -> anyhow::Result<HttpGenerationService> {
    let config = config.context("loading generation config from DAILYLOG_* environment")?;
    HttpGenerationService::new(config).context("building generation client")
}

fn print_day(date: NaiveDate, today: &str, tomorrow: &str) {
    println!(
        "{date}\n{}\n{today}\n{}\n{tomorrow}",
        dailylog_core::MARK_TODAY,
        dailylog_core::MARK_TOMORROW
    );
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Daily { .. } => "daily",
            Self::Show { .. } => "show",
            Self::Predict { .. } => "predict",
            Self::Weekly { .. } => "weekly",
        }
    }
}

/// Generation stand-in for commands that never call the backend.
struct Offline;

impl dailylog_core::GenerationService for Offline {
    fn complete(&self, _prompt: &str) -> dailylog_core::ServiceResult<String> {
        Err(dailylog_core::ServiceError::Transport(
            "generation is not configured for this command".to_string(),
        ))
    }
}
