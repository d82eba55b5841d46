//! Session progress: the short-horizon mastery counter.
//!
//! Distinct from the long-horizon memory state. Progress runs 0..=5;
//! correct answers climb one step, wrong answers fall back to the last
//! checkpoint. Near-miss (`Close`) verdicts never reach this module.

use crate::types::{Card, MAX_MASTERY};

/// Mastery level a wrong answer falls back to once earned.
pub const CHECKPOINT: u8 = 2;

/// Reduce a mastery level by one answer.
///
/// Correct: climb one step, capped at [`MAX_MASTERY`]. Wrong: reset to 0
/// below the checkpoint, otherwise drop back to exactly [`CHECKPOINT`].
pub fn update(level: u8, correct: bool) -> u8 {
    if correct {
        level.saturating_add(1).min(MAX_MASTERY)
    } else if level < CHECKPOINT {
        0
    } else {
        CHECKPOINT
    }
}

/// Whether the card has been mastered this session.
pub fn is_session_completed(card: &Card) -> bool {
    card.mastery_level >= MAX_MASTERY
}

/// Put the card back at the start of a fresh practice run.
pub fn reset(card: &mut Card) {
    card.mastery_level = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[test]
    fn correct_streak_climbs_one_step_at_a_time() {
        for level in 0..MAX_MASTERY {
            assert_eq!(update(level, true), level + 1);
        }
    }

    #[test]
    fn correct_at_max_is_a_no_op() {
        assert_eq!(update(MAX_MASTERY, true), MAX_MASTERY);
    }

    #[test]
    fn wrong_below_checkpoint_resets_to_zero() {
        assert_eq!(update(0, false), 0);
        assert_eq!(update(1, false), 0);
    }

    #[test]
    fn wrong_at_or_above_checkpoint_drops_to_checkpoint() {
        assert_eq!(update(2, false), 2);
        assert_eq!(update(3, false), 2);
        assert_eq!(update(4, false), 2);
        assert_eq!(update(5, false), 2);
    }

    #[test]
    fn bounds_hold_for_any_answer_sequence() {
        let mut level = 0;
        let answers = [true, true, false, true, true, true, false, true, true, true, true, false];
        for &correct in &answers {
            level = update(level, correct);
            assert!(level <= MAX_MASTERY);
        }
    }

    #[test]
    fn completion_and_reset() {
        let mut card = Card::new(
            "She is my best ___.".to_string(),
            "friend".to_string(),
            "arkadaş".to_string(),
            "arkadaş".to_string(),
            Utc::now(),
        );
        assert!(!is_session_completed(&card));

        card.mastery_level = MAX_MASTERY;
        assert!(is_session_completed(&card));

        reset(&mut card);
        assert_eq!(card.mastery_level, 0);
        assert!(!is_session_completed(&card));
    }
}
