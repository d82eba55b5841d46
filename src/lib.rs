//! Scheduling and card-selection core for gap-fill vocabulary practice.
//!
//! Provides:
//! - FSRS memory model (stability/difficulty/due-date scheduling)
//! - Session progress tracking (0..=5 mastery with checkpoint fallback)
//! - Weighted anti-repeat card selection
//! - Typed-answer grading (Levenshtein similarity)
//! - `PracticeSession` wiring the four together, one pass per answer
//!
//! Rendering, import formats and durable storage are collaborator
//! concerns; the core only consumes a card list and hands back updated
//! cards through the [`practice::CardSink`] seam.

pub mod error;
pub mod judge;
pub mod practice;
pub mod progress;
pub mod scheduler;
pub mod selector;
pub mod types;

pub use error::{CoreError, Result};
pub use judge::{grade, levenshtein_distance, normalized_similarity, Judgement, Verdict};
pub use practice::{CardSink, PracticeSession, RejectedCard, TurnOutcome};
pub use scheduler::{fsrs::Fsrs, MemoryModel, SchedulingResult};
pub use selector::{coefficient, SelectionStats, WeightedSelector};
pub use types::{migrate_legacy, Card, Grade, MemoryState, Phase, MAX_MASTERY};
