mod common;

use common::{daily_reply, date, ScriptedGeneration};
use dailylog_core::db::open_db_in_memory;
use dailylog_core::{
    AggregateError, DailyRecord, DayContent, OptimizationStatus, PredictionStatus, RecordStore,
    ReportService, ReportServiceError, ServiceError, SqliteRecordStore, WeeklyReport, WeeklyRun,
    WeeklySchedule,
};

#[test]
fn structured_reply_fills_optimized_sections() {
    let conn = open_db_in_memory().unwrap();
    let generation = ScriptedGeneration::replying(&daily_reply("1. 完成登录页。", "1. 联调。"));
    let service = ReportService::new(SqliteRecordStore::new(&conn), &generation);

    let submission = service
        .submit_daily(date(2024, 6, 3), "登录页", "联调")
        .unwrap();

    assert_eq!(submission.optimization, OptimizationStatus::Structured);
    assert_eq!(submission.record.optimized_today, "1. 完成登录页。");
    assert_eq!(submission.record.optimized_tomorrow, "1. 联调。");
    assert_eq!(
        submission.resolved,
        DayContent::new("1. 完成登录页。", "1. 联调。")
    );
    assert!(generation.prompt(0).contains("今日进展：登录页"));
}

#[test]
fn unformatted_reply_is_kept_raw_and_resolution_falls_back_to_input() {
    let conn = open_db_in_memory().unwrap();
    let generation = ScriptedGeneration::replying("no valid format here");
    let service = ReportService::new(SqliteRecordStore::new(&conn), &generation);

    let submission = service
        .submit_daily(date(2024, 6, 3), " 写文档 ", "评审")
        .unwrap();

    assert_eq!(submission.optimization, OptimizationStatus::Unstructured);
    let stored = SqliteRecordStore::new(&conn)
        .get_by_date(date(2024, 6, 3))
        .unwrap()
        .unwrap();
    assert_eq!(stored.optimized_raw.as_deref(), Some("no valid format here"));
    assert_eq!(stored.optimized_today, "");
    assert_eq!(stored.optimized_tomorrow, "");

    let resolved = service.resolve_day(date(2024, 6, 3)).unwrap().unwrap();
    assert_eq!(resolved, DayContent::new("写文档", "评审"));
}

#[test]
fn reply_with_repeated_marker_is_unstructured_and_never_leaks_markers() {
    let conn = open_db_in_memory().unwrap();
    let reply = format!(
        "{}\n{}\n补充",
        daily_reply("1. 修复。", "1. 发布。"),
        dailylog_core::MARK_TOMORROW
    );
    let generation = ScriptedGeneration::replying(&reply);
    let service = ReportService::new(SqliteRecordStore::new(&conn), &generation);

    let submission = service
        .submit_daily(date(2024, 6, 3), "修复", "发布")
        .unwrap();

    assert_eq!(submission.optimization, OptimizationStatus::Unstructured);
    assert_eq!(submission.record.optimized_today, "");
    assert_eq!(submission.record.optimized_tomorrow, "");
    assert_eq!(submission.resolved, DayContent::new("修复", "发布"));
}

#[test]
fn generation_failure_still_persists_raw_input() {
    let conn = open_db_in_memory().unwrap();
    let generation = ScriptedGeneration::failing(ServiceError::Transport("offline".to_string()));
    let service = ReportService::new(SqliteRecordStore::new(&conn), &generation);

    let submission = service.submit_daily(date(2024, 6, 3), "a", "b").unwrap();

    assert!(matches!(
        submission.optimization,
        OptimizationStatus::ServiceFailed(ServiceError::Transport(_))
    ));
    assert_eq!(submission.record, DailyRecord::new(date(2024, 6, 3), "a", "b"));
    assert_eq!(submission.resolved, DayContent::new("a", "b"));
}

#[test]
fn resubmitting_a_date_replaces_the_record() {
    let conn = open_db_in_memory().unwrap();
    let generation = ScriptedGeneration::new(vec![
        Ok(daily_reply("first", "first plan")),
        Ok("plain text".to_string()),
    ]);
    let service = ReportService::new(SqliteRecordStore::new(&conn), &generation);

    service.submit_daily(date(2024, 6, 3), "v1", "p1").unwrap();
    let second = service.submit_daily(date(2024, 6, 3), "v2", "p2").unwrap();

    assert_eq!(second.record.original_today, "v2");
    assert_eq!(second.record.optimized_today, "");
    assert_eq!(second.resolved, DayContent::new("v2", "p2"));
}

#[test]
fn resolve_day_of_unknown_date_is_none() {
    let conn = open_db_in_memory().unwrap();
    let generation = ScriptedGeneration::silent();
    let service = ReportService::new(SqliteRecordStore::new(&conn), &generation);

    assert!(service.resolve_day(date(2024, 6, 3)).unwrap().is_none());
}

#[test]
fn predict_for_uses_only_earlier_records() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn);
    for day in [3, 4, 5] {
        store
            .upsert_daily_record(&DailyRecord::new(date(2024, 6, day), format!("t{day}"), "p"))
            .unwrap();
    }

    let generation = ScriptedGeneration::replying(&daily_reply("x", "y"));
    let service = ReportService::new(SqliteRecordStore::new(&conn), &generation);

    let prediction = service.predict_for(date(2024, 6, 5)).unwrap();
    assert_eq!(prediction.status, PredictionStatus::Predicted);
    let prompt = generation.prompt(0);
    assert!(prompt.contains("t4"));
    assert!(prompt.contains("t3"));
    assert!(!prompt.contains("t5"));
}

#[test]
fn predict_for_without_history_makes_no_call() {
    let conn = open_db_in_memory().unwrap();
    let generation = ScriptedGeneration::silent();
    let service = ReportService::new(SqliteRecordStore::new(&conn), &generation);

    let prediction = service.predict_for(date(2024, 6, 3)).unwrap();
    assert_eq!(prediction.status, PredictionStatus::NoHistory);
    assert_eq!(generation.calls(), 0);
}

#[test]
fn run_weekly_skips_non_designated_days() {
    let conn = open_db_in_memory().unwrap();
    let generation = ScriptedGeneration::silent();
    let service = ReportService::new(SqliteRecordStore::new(&conn), &generation);

    let run = service
        .run_weekly(date(2024, 6, 6), &WeeklySchedule::default())
        .unwrap();
    assert_eq!(run, WeeklyRun::NotScheduled);
    assert_eq!(generation.calls(), 0);
}

#[test]
fn run_weekly_on_friday_covers_the_business_week() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn);
    for day in [2, 3, 5, 7] {
        store
            .upsert_daily_record(&DailyRecord::new(date(2024, 6, day), format!("d{day}"), "p"))
            .unwrap();
    }

    let generation = ScriptedGeneration::replying("周报");
    let service = ReportService::new(SqliteRecordStore::new(&conn), &generation);

    let run = service
        .run_weekly(date(2024, 6, 7), &WeeklySchedule::default())
        .unwrap();
    assert_eq!(
        run,
        WeeklyRun::Created(WeeklyReport::new(date(2024, 6, 3), date(2024, 6, 7), "周报"))
    );

    let prompt = generation.prompt(0);
    assert!(prompt.contains("第3天：\n今日进展：d7"));
    assert!(!prompt.contains("d2"));
}

#[test]
fn existing_weekly_report_is_not_regenerated() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::new(&conn);
    store
        .upsert_daily_record(&DailyRecord::new(date(2024, 6, 4), "t", "p"))
        .unwrap();
    let existing = WeeklyReport::new(date(2024, 6, 3), date(2024, 6, 7), "旧周报");
    store.insert_weekly_report(&existing).unwrap();

    let generation = ScriptedGeneration::silent();
    let service = ReportService::new(SqliteRecordStore::new(&conn), &generation);

    let run = service
        .generate_weekly(date(2024, 6, 3), date(2024, 6, 7))
        .unwrap();
    assert_eq!(run, WeeklyRun::AlreadyExists(existing));
    assert_eq!(generation.calls(), 0);
}

#[test]
fn weekly_over_empty_window_reports_empty_window() {
    let conn = open_db_in_memory().unwrap();
    let generation = ScriptedGeneration::silent();
    let service = ReportService::new(SqliteRecordStore::new(&conn), &generation);

    let err = service
        .generate_weekly(date(2024, 6, 3), date(2024, 6, 7))
        .unwrap_err();
    assert!(matches!(
        err,
        ReportServiceError::Aggregate(AggregateError::EmptyWindow { .. })
    ));
    assert!(service
        .get_weekly(date(2024, 6, 3), date(2024, 6, 7))
        .unwrap()
        .is_none());
}
