//! Batch processing: orchestration and run statistics.

pub mod processor;
pub mod types;

pub use processor::{BatchOrchestrator, persist_on_abort};
pub use types::{ErrorKind, ProcessingStats, SkipReason};
