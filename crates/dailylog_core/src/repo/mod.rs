//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the keyed record-store contract used by the pipeline.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes validate domain objects before persistence.
//! - Repository APIs return semantic errors (`DuplicateWeeklyReport`,
//!   `InvalidData`) in addition to DB transport errors.

pub mod record_repo;
