//! Weighted random card selection.
//!
//! Lower mastery means a higher sampling weight, so fresh and struggling
//! words come up more often. Mastered cards (level 5) keep weight 0 and
//! never leave storage, they just stop being drawn. One selector instance
//! per practice session; the anti-repeat memory lives on the instance.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::types::{Card, MAX_MASTERY};

/// Sampling weight for a mastery level.
///
/// Out-of-range levels get the new-word weight so malformed data is
/// over-practiced rather than silently dropped.
pub fn coefficient(mastery_level: u8) -> u32 {
    match mastery_level {
        0 => 10,
        1 => 8,
        2 => 6,
        3 => 4,
        4 => 2,
        5 => 0,
        _ => 10,
    }
}

/// Weighted selector with anti-repeat memory.
pub struct WeightedSelector<R: Rng = StdRng> {
    rng: R,
    last_selected: Option<String>,
}

impl WeightedSelector<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for WeightedSelector<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> WeightedSelector<R> {
    /// Build a selector around an injected RNG (seeded in tests).
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            last_selected: None,
        }
    }

    /// Target word of the most recently selected card, if any.
    pub fn last_selected(&self) -> Option<&str> {
        self.last_selected.as_deref()
    }

    /// Forget the anti-repeat memory (new practice run).
    pub fn reset(&mut self) {
        self.last_selected = None;
    }

    /// Draw the next card to practice.
    ///
    /// Returns an index into `cards`, or `None` when no active card
    /// remains (deck complete). The drawn card is remembered so the next
    /// call avoids an immediate repeat whenever an alternative exists.
    pub fn select_next(&mut self, cards: &[Card]) -> Option<usize> {
        let active: Vec<usize> = cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.mastery_level < MAX_MASTERY)
            .map(|(idx, _)| idx)
            .collect();

        tracing::debug!(active = active.len(), total = cards.len(), "selecting next card");

        if active.is_empty() {
            return None;
        }

        let idx = self.pick(cards, &active);
        let card = &cards[idx];
        tracing::debug!(
            word = %card.target_word,
            mastery = card.mastery_level,
            weight = coefficient(card.mastery_level),
            "card selected"
        );
        self.last_selected = Some(card.target_word.clone());
        Some(idx)
    }

    fn pick(&mut self, cards: &[Card], active: &[usize]) -> usize {
        if active.len() == 1 {
            return active[0];
        }

        // Exclude the previous pick when an alternative exists; with a
        // single active card left the full set keeps the session moving.
        let reduced: Vec<usize> = match &self.last_selected {
            Some(last) => active
                .iter()
                .copied()
                .filter(|&idx| cards[idx].target_word != *last)
                .collect(),
            None => Vec::new(),
        };
        let candidates: &[usize] = if reduced.is_empty() { active } else { &reduced };

        let total: u32 = candidates
            .iter()
            .map(|&idx| coefficient(cards[idx].mastery_level))
            .sum();
        if total == 0 {
            // Degenerate weights, deterministic fallback.
            return candidates[0];
        }

        let roll: f64 = self.rng.gen_range(0.0..total as f64);
        let mut cumulative = 0.0;
        for &idx in candidates {
            cumulative += coefficient(cards[idx].mastery_level) as f64;
            if roll <= cumulative {
                return idx;
            }
        }
        candidates[candidates.len() - 1]
    }
}

/// Per-level slice of the sampling distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelStats {
    pub count: usize,
    pub coefficient: u32,
    /// Share of the total weight held by this level, 0.0..=1.0.
    pub share: f64,
}

/// Snapshot of the selection distribution over a card list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionStats {
    pub total: usize,
    pub active: usize,
    pub mastered: usize,
    pub total_weight: u32,
    pub distribution: BTreeMap<u8, LevelStats>,
}

impl SelectionStats {
    /// Summarize how likely each mastery level is to be drawn.
    pub fn collect(cards: &[Card]) -> Self {
        let mut stats = Self {
            total: cards.len(),
            active: 0,
            mastered: 0,
            total_weight: 0,
            distribution: BTreeMap::new(),
        };

        for card in cards {
            if card.mastery_level >= MAX_MASTERY {
                stats.mastered += 1;
                continue;
            }
            stats.active += 1;
            stats.total_weight += coefficient(card.mastery_level);
        }

        for card in cards {
            if card.mastery_level >= MAX_MASTERY {
                continue;
            }
            let weight = coefficient(card.mastery_level);
            let entry = stats
                .distribution
                .entry(card.mastery_level)
                .or_insert(LevelStats {
                    count: 0,
                    coefficient: weight,
                    share: 0.0,
                });
            entry.count += 1;
            if stats.total_weight > 0 {
                entry.share += weight as f64 / stats.total_weight as f64;
            }
        }

        stats
    }
}
