//! Domain model for daily records and weekly roll-ups.
//!
//! # Responsibility
//! - Define canonical data structures used by the report pipeline.
//! - Keep storage-agnostic shapes; persistence lives in `repo`.
//!
//! # Invariants
//! - Every daily record is identified by its calendar date.
//! - Every weekly report is identified by its `(week_start, week_end)` pair.

pub mod content;
pub mod daily_record;
pub mod weekly_report;
