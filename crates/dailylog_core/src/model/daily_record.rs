//! Daily record domain model.
//!
//! # Responsibility
//! - Define the per-date record holding raw input and its optimized forms.
//!
//! # Invariants
//! - `date` is the natural key; at most one record exists per date.
//! - `optimized_today` / `optimized_tomorrow` are derived from
//!   `optimized_raw` at write time and may be empty when extraction missed.
//! - Updates overwrite all content fields together.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical per-date record of progress and plan content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar date; immutable once created.
    pub date: NaiveDate,
    /// Raw user-entered "today's progress".
    pub original_today: String,
    /// Raw user-entered "tomorrow's plan".
    pub original_tomorrow: String,
    /// Full unstructured generation output, absent when generation failed.
    pub optimized_raw: Option<String>,
    /// Today section extracted from `optimized_raw`.
    pub optimized_today: String,
    /// Tomorrow section extracted from `optimized_raw`.
    pub optimized_tomorrow: String,
}

impl DailyRecord {
    /// Creates a record holding only raw input.
    ///
    /// Optimized fields start empty and `optimized_raw` starts as `None`.
    pub fn new(
        date: NaiveDate,
        original_today: impl Into<String>,
        original_tomorrow: impl Into<String>,
    ) -> Self {
        Self {
            date,
            original_today: original_today.into(),
            original_tomorrow: original_tomorrow.into(),
            optimized_raw: None,
            optimized_today: String::new(),
            optimized_tomorrow: String::new(),
        }
    }

    /// Returns whether a generation result was stored for this date.
    pub fn has_optimization(&self) -> bool {
        self.optimized_raw.is_some()
    }
}
