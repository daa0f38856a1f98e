// src/export/mod.rs
//! The export walk: per-run traversal state and the recursive page driver.

mod context;
mod orchestrator;

pub use context::{ExportStats, PageScope, TraversalContext};
pub use orchestrator::{ExportReport, Exporter};
