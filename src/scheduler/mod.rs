//! Long-horizon review scheduling.

pub mod fsrs;

use chrono::{DateTime, Utc};

use crate::types::{Grade, MemoryState};

/// Result of scheduling a card after a graded answer.
#[derive(Debug, Clone)]
pub struct SchedulingResult {
    pub new_state: MemoryState,
    pub next_due: DateTime<Utc>,
}

/// Trait for memory models that turn a grade into the next review state.
pub trait MemoryModel: Send + Sync {
    /// Model identifier.
    fn name(&self) -> &'static str;

    /// State for a card that has never been reviewed.
    fn initial_state(&self, now: DateTime<Utc>) -> MemoryState;

    /// Calculate the next review state after a graded answer.
    fn schedule(&self, state: &MemoryState, grade: Grade, now: DateTime<Utc>) -> SchedulingResult;
}
