//! Weekly trigger policy.
//!
//! The aggregator itself does not care when it runs; this policy decides
//! whether a given day triggers a roll-up and which window it covers.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Designated weekday plus the number of business days to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklySchedule {
    pub weekday: Weekday,
    pub business_days: u32,
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self {
            weekday: Weekday::Fri,
            business_days: 5,
        }
    }
}

impl WeeklySchedule {
    /// Returns the window ending on `day` when `day` is the designated weekday.
    pub fn window_for(&self, day: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        if day.weekday() != self.weekday {
            return None;
        }
        Some((business_window_start(day, self.business_days), day))
    }
}

/// Returns the first day of the `business_days` most recent business days
/// ending on `end` (inclusive of `end` when it is a business day).
pub fn business_window_start(end: NaiveDate, business_days: u32) -> NaiveDate {
    let mut start = end;
    let mut counted = u32::from(is_business_day(end));
    while counted < business_days {
        start -= Duration::days(1);
        if is_business_day(start) {
            counted += 1;
        }
    }
    start
}

fn is_business_day(day: NaiveDate) -> bool {
    !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}
