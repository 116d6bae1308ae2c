//! Two-section day content shared by extraction, resolution and prediction.

use serde::{Deserialize, Serialize};

/// A `today` / `tomorrow` pair of free text.
///
/// Used as the common return shape of section extraction, content resolution
/// and next-day prediction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayContent {
    /// "Today's progress" section.
    pub today: String,
    /// "Tomorrow's plan" section.
    pub tomorrow: String,
}

impl DayContent {
    /// Builds a pair from any string-like values, without trimming.
    pub fn new(today: impl Into<String>, tomorrow: impl Into<String>) -> Self {
        Self {
            today: today.into(),
            tomorrow: tomorrow.into(),
        }
    }
}
