//! Practice session: one judge -> progress -> scheduler -> selector pass
//! per submitted answer.
//!
//! The session exclusively owns its working set of cards. Durable storage
//! is a collaborator behind [`CardSink`]; after every mutating turn it is
//! handed the full, freshly updated card list.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{CoreError, Result};
use crate::judge::{self, Verdict};
use crate::progress;
use crate::scheduler::fsrs::Fsrs;
use crate::scheduler::MemoryModel;
use crate::selector::WeightedSelector;
use crate::types::{Card, Grade, MAX_MASTERY};

/// Persistence seam. Implementations must write the list as given;
/// the session always passes the state it just computed.
pub trait CardSink {
    fn save(&mut self, cards: &[Card]);
}

/// A card dropped from an imported batch, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedCard {
    pub card: Card,
    pub error: CoreError,
}

/// Result of one answered turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub verdict: Verdict,
    pub similarity: f64,
    /// Mastery level of the answered card after the turn.
    pub mastery: u8,
    /// True when this turn pushed the card to mastered.
    pub newly_mastered: bool,
    /// Index of the next card to show, `None` when the pool is exhausted.
    pub next: Option<usize>,
}

/// One practice run over a set of cards.
pub struct PracticeSession<R: Rng = StdRng> {
    cards: Vec<Card>,
    selector: WeightedSelector<R>,
    model: Box<dyn MemoryModel>,
    sink: Option<Box<dyn CardSink>>,
    current: Option<usize>,
}

impl PracticeSession<StdRng> {
    /// Build a session, skipping invalid cards.
    ///
    /// Rejected cards are returned to the caller rather than silently
    /// dropped; the session continues with the valid remainder.
    pub fn new(cards: Vec<Card>) -> (Self, Vec<RejectedCard>) {
        Self::with_rng(cards, StdRng::from_entropy())
    }
}

impl<R: Rng> PracticeSession<R> {
    /// Like [`PracticeSession::new`] with an injected RNG (seeded in tests).
    pub fn with_rng(cards: Vec<Card>, rng: R) -> (Self, Vec<RejectedCard>) {
        let mut valid = Vec::with_capacity(cards.len());
        let mut rejected = Vec::new();

        for card in cards {
            match card.validate() {
                Ok(()) => valid.push(card),
                Err(error) => {
                    tracing::warn!(%error, "skipping invalid card in batch");
                    rejected.push(RejectedCard { card, error });
                }
            }
        }

        let session = Self {
            cards: valid,
            selector: WeightedSelector::with_rng(rng),
            model: Box::new(Fsrs::default()),
            sink: None,
            current: None,
        };
        (session, rejected)
    }

    /// Swap in a different memory model.
    pub fn with_model(mut self, model: Box<dyn MemoryModel>) -> Self {
        self.model = model;
        self
    }

    /// Install the persistence collaborator.
    pub fn set_sink(&mut self, sink: Box<dyn CardSink>) {
        self.sink = Some(sink);
    }

    /// The working set, including mastered cards.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The card currently awaiting an answer.
    pub fn current_card(&self) -> Option<&Card> {
        self.current.map(|idx| &self.cards[idx])
    }

    /// True once every card has been mastered.
    pub fn is_complete(&self) -> bool {
        self.cards
            .iter()
            .all(|card| card.mastery_level >= MAX_MASTERY)
    }

    /// Draw the next card to show. `None` means the deck is complete.
    pub fn next_card(&mut self) -> Option<&Card> {
        self.current = self.selector.select_next(&self.cards);
        self.current_card()
    }

    /// Answer the current card at the present time.
    pub fn answer(&mut self, typed: &str) -> Result<TurnOutcome> {
        self.answer_at(typed, Utc::now())
    }

    /// Answer the current card, with the clock injected.
    ///
    /// `Close` verdicts replay the turn: no card state changes, nothing is
    /// persisted, and the same card stays current. `Correct` and `Wrong`
    /// run the progress reducer and feed the memory model exactly once,
    /// then advance the selector.
    pub fn answer_at(&mut self, typed: &str, now: DateTime<Utc>) -> Result<TurnOutcome> {
        let idx = self.current.ok_or(CoreError::NoCardSelected)?;
        let judgement = judge::grade(typed, &self.cards[idx].target_word)?;

        if judgement.verdict == Verdict::Close {
            tracing::debug!(
                word = %self.cards[idx].target_word,
                similarity = judgement.similarity,
                "near miss, replaying turn"
            );
            return Ok(TurnOutcome {
                verdict: Verdict::Close,
                similarity: judgement.similarity,
                mastery: self.cards[idx].mastery_level,
                newly_mastered: false,
                next: Some(idx),
            });
        }

        let correct = judgement.verdict == Verdict::Correct;
        let card = &mut self.cards[idx];
        let level_before = card.mastery_level;
        let grade = grade_for(correct, level_before, card.memory.difficulty);

        card.mastery_level = progress::update(level_before, correct);
        card.memory = self.model.schedule(&card.memory, grade, now).new_state;
        card.last_practiced = Some(now);

        let mastery = card.mastery_level;
        let newly_mastered = level_before < MAX_MASTERY && mastery >= MAX_MASTERY;
        tracing::debug!(
            word = %card.target_word,
            verdict = ?judgement.verdict,
            mastery_before = level_before,
            mastery_after = mastery,
            "turn applied"
        );

        if let Some(sink) = self.sink.as_mut() {
            sink.save(&self.cards);
        }

        self.current = self.selector.select_next(&self.cards);
        Ok(TurnOutcome {
            verdict: judgement.verdict,
            similarity: judgement.similarity,
            mastery,
            newly_mastered,
            next: self.current,
        })
    }

    /// Start a fresh run: zero all session progress and forget the
    /// selector's anti-repeat memory. Long-horizon memory state is kept.
    pub fn reset_progress(&mut self) {
        for card in &mut self.cards {
            progress::reset(card);
        }
        self.selector.reset();
        self.current = None;
        if let Some(sink) = self.sink.as_mut() {
            sink.save(&self.cards);
        }
    }
}

/// Map a judged turn onto a scheduler grade.
///
/// Wrong answers always lapse. Correct answers grade by how far the card
/// had climbed this session (sampled before the increment), with a Hard
/// downgrade for items the model already considers difficult.
fn grade_for(correct: bool, session_progress: u8, difficulty: f64) -> Grade {
    if !correct {
        return Grade::Again;
    }
    if session_progress >= 4 {
        Grade::Easy
    } else if session_progress >= 2 {
        Grade::Good
    } else if difficulty > 7.0 {
        Grade::Hard
    } else {
        Grade::Good
    }
}
