//! Core types for gap-fill vocabulary practice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Session progress at which a card counts as mastered and leaves the
/// active rotation.
pub const MAX_MASTERY: u8 = 5;

/// Memory phase of a card in the scheduler's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    New,
    Learning,
    Review,
    Relearning,
}

impl Default for Phase {
    fn default() -> Self {
        Self::New
    }
}

/// Recall grade fed into the memory model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    /// Convert to 4-point numeric value (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from 4-point numeric value.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }
}

/// Long-horizon memory state of one card (FSRS fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryState {
    pub due: DateTime<Utc>,
    /// Estimated days until recall probability drops to the reference
    /// threshold. Never below the scheduler's stability floor.
    pub stability: f64,
    /// Intrinsic item hardness, clamped to 1..=10.
    pub difficulty: f64,
    pub elapsed_days: i64,
    pub scheduled_days: i64,
    pub reps: u32,
    pub lapses: u32,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// State for a card that has never been reviewed.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            due: now,
            stability: 1.0,
            difficulty: 5.0,
            elapsed_days: 0,
            scheduled_days: 1,
            reps: 0,
            lapses: 0,
            phase: Phase::New,
            last_review: None,
        }
    }

    /// Seed memory state from a legacy repeat count.
    ///
    /// Older exports tracked only how many times a word had been repeated.
    /// A positive count is treated as that many past reviews with a rough
    /// stability estimate of two days per repetition.
    pub fn from_legacy_reps(reps: u32, now: DateTime<Utc>) -> Self {
        let mut state = Self::new(now);
        if reps > 0 {
            state.reps = reps;
            state.phase = Phase::Review;
            state.stability = (reps as f64 * 2.0).max(1.0);
        }
        state
    }
}

impl Default for MemoryState {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// One vocabulary item: a sentence with a missing word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Sentence containing the target word (or an explicit blank marker).
    pub sentence_template: String,
    /// The word being tested. Never empty on a valid card.
    pub target_word: String,
    pub translation: String,
    pub translation_annotated: String,
    /// Short-horizon session progress, 0..=5. 5 means mastered.
    #[serde(default)]
    pub mastery_level: u8,
    #[serde(default)]
    pub memory: MemoryState,
    /// Repeat count carried by pre-FSRS exports. Zero on modern records.
    #[serde(default)]
    pub repeat_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_practiced: Option<DateTime<Utc>>,
}

impl Card {
    pub fn new(
        sentence_template: String,
        target_word: String,
        translation: String,
        translation_annotated: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            sentence_template,
            target_word,
            translation,
            translation_annotated,
            mastery_level: 0,
            memory: MemoryState::new(now),
            repeat_count: 0,
            last_practiced: None,
        }
    }

    /// Check the required fields.
    pub fn validate(&self) -> Result<()> {
        if self.target_word.trim().is_empty() {
            return Err(CoreError::EmptyTargetWord);
        }
        if self.sentence_template.trim().is_empty() {
            return Err(CoreError::EmptySentence {
                word: self.target_word.clone(),
            });
        }
        Ok(())
    }
}

/// One-time migration applied when a batch is imported.
///
/// Records that predate the memory model carry only `repeat_count`; seed
/// their FSRS fields here so read sites never need fallback defaults.
pub fn migrate_legacy(cards: &mut [Card], now: DateTime<Utc>) {
    for card in cards.iter_mut() {
        if card.repeat_count > 0 && card.memory.reps == 0 {
            tracing::debug!(word = %card.target_word, reps = card.repeat_count, "migrating legacy card");
            card.memory = MemoryState::from_legacy_reps(card.repeat_count, now);
        }
    }
}
