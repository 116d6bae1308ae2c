//! Content resolution and aggregation pipeline.
//!
//! # Responsibility
//! - Extract structured sections from unstructured generation output.
//! - Pick the authoritative content of a day through a fixed fallback chain.
//! - Compose prediction and weekly roll-up prompts and interpret replies.
//!
//! # Invariants
//! - Section markers are one shared format constant for prompts and parsing.
//! - Extraction and resolution never fail; misses degrade to empty strings.
//! - Each component performs at most one generation call per invocation.

pub mod predict;
pub mod prompt;
pub mod resolver;
pub mod sections;
pub mod weekly;
