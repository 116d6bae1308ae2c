//! Authoritative content selection for one daily record.
//!
//! Per field, the first non-empty candidate wins:
//! 1. stored `optimized_*` value,
//! 2. extraction over `optimized_raw`,
//! 3. `original_*` raw input.
//!
//! Resolution is pure: no I/O, deterministic, idempotent.

use crate::model::content::DayContent;
use crate::model::daily_record::DailyRecord;
use crate::pipeline::sections::extract;

/// Resolves the final `today` / `tomorrow` content of `record`, trimmed.
pub fn resolve(record: &DailyRecord) -> DayContent {
    let extracted = record
        .optimized_raw
        .as_deref()
        .map(|raw| extract(raw).into_content())
        .unwrap_or_default();

    DayContent::new(
        first_non_empty([
            record.optimized_today.as_str(),
            extracted.today.as_str(),
            record.original_today.as_str(),
        ]),
        first_non_empty([
            record.optimized_tomorrow.as_str(),
            extracted.tomorrow.as_str(),
            record.original_tomorrow.as_str(),
        ]),
    )
}

fn first_non_empty<'a>(candidates: [&'a str; 3]) -> &'a str {
    candidates
        .into_iter()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::model::daily_record::DailyRecord;
    use crate::pipeline::sections::{MARK_TODAY, MARK_TOMORROW};
    use chrono::NaiveDate;

    fn record() -> DailyRecord {
        DailyRecord::new(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(), "Y", "Y2")
    }

    #[test]
    fn stored_optimized_value_wins() {
        let mut record = record();
        record.optimized_today = "X".to_string();
        record.optimized_raw = Some(format!("{MARK_TODAY} other {MARK_TOMORROW} plan"));

        let content = resolve(&record);
        assert_eq!(content.today, "X");
        assert_eq!(content.tomorrow, "plan");
    }

    #[test]
    fn extraction_from_raw_is_second_choice() {
        let mut record = record();
        record.optimized_raw = Some(format!("{MARK_TODAY}\n Z \n{MARK_TOMORROW}\n W "));

        let content = resolve(&record);
        assert_eq!(content.today, "Z");
        assert_eq!(content.tomorrow, "W");
    }

    #[test]
    fn original_input_is_last_resort_even_when_empty() {
        let mut record = DailyRecord::new(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(), "", " b ");
        record.optimized_raw = Some("no valid format here".to_string());

        let content = resolve(&record);
        assert_eq!(content.today, "");
        assert_eq!(content.tomorrow, "b");
    }

    #[test]
    fn raw_with_repeated_marker_falls_back_to_original() {
        let mut record = record();
        record.optimized_raw = Some(format!("{MARK_TODAY} a {MARK_TODAY} b {MARK_TOMORROW} c"));

        let content = resolve(&record);
        assert_eq!(content.today, "Y");
        assert_eq!(content.tomorrow, "Y2");
        assert!(!content.today.contains(MARK_TODAY));
    }

    #[test]
    fn whitespace_only_candidates_count_as_empty() {
        let mut record = record();
        record.optimized_today = "   ".to_string();

        assert_eq!(resolve(&record).today, "Y");
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut record = record();
        record.optimized_raw = Some(format!("{MARK_TODAY} a {MARK_TOMORROW} b"));

        assert_eq!(resolve(&record), resolve(&record));
    }
}
