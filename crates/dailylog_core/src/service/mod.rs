//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store reads, pipeline components and store writes into
//!   use-case level APIs.
//! - Own the weekly trigger policy.
//! - Keep the CLI boundary decoupled from storage and generation details.

pub mod report_service;
pub mod schedule;
