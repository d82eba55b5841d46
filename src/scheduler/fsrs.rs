//! FSRS (Free Spaced Repetition Scheduler) memory model.
//!
//! DSR model over three quantities:
//! - Difficulty (D): intrinsic item hardness, 1-10
//! - Stability (S): days until recall probability drops to the target
//! - phase machine: New -> Learning/Review -> Relearning on lapse

use chrono::{DateTime, Duration, Utc};

use super::{MemoryModel, SchedulingResult};
use crate::types::{Grade, MemoryState, Phase};

/// Stability is never evaluated at or below this floor.
pub const MIN_STABILITY: f64 = 0.1;

/// FSRS-4.5 model with configurable weights.
#[derive(Debug, Clone)]
pub struct Fsrs {
    /// FSRS-4.5 parameters (19 weights).
    pub w: [f64; 19],
}

impl Default for Fsrs {
    fn default() -> Self {
        Self {
            w: [
                0.4072, 1.1829, 3.1262, 15.4722, // w[0-3]: initial stability per grade
                7.2102,  // w[4]: initial difficulty base
                0.5316,  // w[5]: initial difficulty modifier
                1.0651,  // w[6]: difficulty bump on lapse
                0.0234,  // w[7]: difficulty drift on recall
                1.616,   // w[8]: stability exp base
                0.1544,  // w[9]: stability decay
                1.0824,  // w[10]: schedule-ratio effect
                1.9813,  // w[11]: forget stability base
                0.0953,  // w[12]: difficulty on forget
                0.2975,  // w[13]: stability on forget
                2.2042,  // w[14]: elapsed-time decay on forget
                0.2407, 2.9466, 0.5034, 0.6567, // w[15-18]: reserved
            ],
        }
    }
}

impl MemoryModel for Fsrs {
    fn name(&self) -> &'static str {
        "fsrs"
    }

    fn initial_state(&self, now: DateTime<Utc>) -> MemoryState {
        MemoryState::new(now)
    }

    fn schedule(&self, state: &MemoryState, grade: Grade, now: DateTime<Utc>) -> SchedulingResult {
        let elapsed_days = match state.last_review {
            Some(prev) => now.signed_duration_since(prev).num_days().max(0),
            None => 0,
        };

        let new_stability = self.next_stability(state, elapsed_days, grade);
        let new_difficulty = self.next_difficulty(state, grade);
        let interval = Self::interval_from_stability(new_stability);
        let next_due = now + Duration::days(interval);

        let new_lapses = if grade == Grade::Again {
            state.lapses + 1
        } else {
            state.lapses
        };

        SchedulingResult {
            new_state: MemoryState {
                due: next_due,
                stability: new_stability,
                difficulty: new_difficulty,
                elapsed_days,
                scheduled_days: interval,
                reps: state.reps + 1,
                lapses: new_lapses,
                phase: Self::next_phase(state.phase, grade),
                last_review: Some(now),
            },
            next_due,
        }
    }
}

impl Fsrs {
    /// S0(G) = w[G-1] for the first review of a card.
    fn initial_stability(&self, grade: Grade) -> f64 {
        self.w[(grade.to_value() - 1) as usize].max(MIN_STABILITY)
    }

    fn next_stability(&self, state: &MemoryState, elapsed_days: i64, grade: Grade) -> f64 {
        let new_s = match state.phase {
            // Learning steps reset stability to the per-grade seed.
            Phase::New | Phase::Learning | Phase::Relearning => self.initial_stability(grade),
            Phase::Review => {
                let difficulty = state.difficulty.clamp(1.0, 10.0);
                let stability = state.stability.max(MIN_STABILITY);
                if grade == Grade::Again {
                    self.stability_after_forget(stability, difficulty, elapsed_days)
                } else {
                    self.stability_after_recall(state, stability, difficulty, elapsed_days)
                }
            }
        };
        new_s.max(MIN_STABILITY)
    }

    /// S' = w[11] * D^(-w[12]) * ((S+1)^w[13] - 1) * e^(-w[14] * t)
    fn stability_after_forget(&self, stability: f64, difficulty: f64, elapsed_days: i64) -> f64 {
        let d_factor = difficulty.powf(-self.w[12]);
        let s_factor = (stability + 1.0).powf(self.w[13]) - 1.0;
        let t_factor = (-self.w[14] * elapsed_days as f64).exp();
        self.w[11] * d_factor * s_factor * t_factor
    }

    /// S' = S * (e^(w[8]) * (11 - D) * S^(-w[9]) * (e^(w[10]*(1 - t/sched)) - 1) + 1)
    fn stability_after_recall(
        &self,
        state: &MemoryState,
        stability: f64,
        difficulty: f64,
        elapsed_days: i64,
    ) -> f64 {
        let scheduled = state.scheduled_days.max(1) as f64;
        let ratio = 1.0 - elapsed_days as f64 / scheduled;
        let growth = self.w[8].exp()
            * (11.0 - difficulty)
            * stability.powf(-self.w[9])
            * ((self.w[10] * ratio).exp() - 1.0);
        stability * (growth + 1.0)
    }

    fn next_difficulty(&self, state: &MemoryState, grade: Grade) -> f64 {
        let g = grade.to_value() as f64;
        let new_d = match (state.phase, grade) {
            // D0(G) = w[4] - w[5] * (G - 3)
            (Phase::New, _) => self.w[4] - self.w[5] * (g - 3.0),
            (Phase::Review, Grade::Again) => state.difficulty + self.w[6],
            (Phase::Review, _) => state.difficulty - self.w[7] * (g - 3.0),
            _ => state.difficulty,
        };
        new_d.clamp(1.0, 10.0)
    }

    /// I = max(1, round(S * 0.9)), in whole days.
    fn interval_from_stability(stability: f64) -> i64 {
        ((stability * 0.9).round() as i64).max(1)
    }

    fn next_phase(phase: Phase, grade: Grade) -> Phase {
        match (phase, grade) {
            (Phase::New, Grade::Again) => Phase::Learning,
            (Phase::New, _) => Phase::Review,
            (Phase::Learning, Grade::Again) => Phase::Learning,
            (Phase::Learning, _) => Phase::Review,
            (Phase::Review, Grade::Again) => Phase::Relearning,
            (Phase::Review, _) => Phase::Review,
            (Phase::Relearning, Grade::Again) => Phase::Relearning,
            (Phase::Relearning, _) => Phase::Review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn review_state(stability: f64, difficulty: f64, at: DateTime<Utc>) -> MemoryState {
        MemoryState {
            due: at,
            stability,
            difficulty,
            elapsed_days: 0,
            scheduled_days: Fsrs::interval_from_stability(stability),
            reps: 5,
            lapses: 0,
            phase: Phase::Review,
            last_review: Some(at),
        }
    }

    #[test]
    fn new_card_good_enters_review() {
        let fsrs = Fsrs::default();
        let current = now();
        let state = fsrs.initial_state(current);

        let result = fsrs.schedule(&state, Grade::Good, current);

        assert_eq!(result.new_state.phase, Phase::Review);
        assert_eq!(result.new_state.stability, fsrs.w[2]);
        assert_eq!(result.new_state.reps, 1);
        assert_eq!(result.new_state.last_review, Some(current));
    }

    #[test]
    fn new_card_again_enters_learning() {
        let fsrs = Fsrs::default();
        let current = now();
        let state = fsrs.initial_state(current);

        let result = fsrs.schedule(&state, Grade::Again, current);

        assert_eq!(result.new_state.phase, Phase::Learning);
        assert_eq!(result.new_state.stability, fsrs.w[0]);
        assert_eq!(result.new_state.lapses, 1);
    }

    #[test]
    fn initial_stability_increases_with_grade() {
        let fsrs = Fsrs::default();
        let s_again = fsrs.initial_stability(Grade::Again);
        let s_hard = fsrs.initial_stability(Grade::Hard);
        let s_good = fsrs.initial_stability(Grade::Good);
        let s_easy = fsrs.initial_stability(Grade::Easy);

        assert!(s_again < s_hard);
        assert!(s_hard < s_good);
        assert!(s_good < s_easy);
    }

    #[test]
    fn initial_difficulty_decreases_with_grade() {
        let fsrs = Fsrs::default();
        let current = now();
        let state = fsrs.initial_state(current);

        let d_again = fsrs.schedule(&state, Grade::Again, current).new_state.difficulty;
        let d_good = fsrs.schedule(&state, Grade::Good, current).new_state.difficulty;
        let d_easy = fsrs.schedule(&state, Grade::Easy, current).new_state.difficulty;

        assert!(d_again > d_good);
        assert!(d_good > d_easy);
    }

    #[test]
    fn review_recall_grows_stability() {
        let fsrs = Fsrs::default();
        let current = now();
        let state = review_state(5.0, 5.0, current);

        let result = fsrs.schedule(&state, Grade::Good, current);

        assert!(result.new_state.stability > 5.0);
        assert_eq!(result.new_state.phase, Phase::Review);
        assert_eq!(result.new_state.lapses, 0);
    }

    #[test]
    fn review_lapse_shrinks_stability_and_relearns() {
        let fsrs = Fsrs::default();
        let current = now();
        let state = review_state(10.0, 5.0, current);

        let result = fsrs.schedule(&state, Grade::Again, current);

        assert!(result.new_state.stability < 10.0);
        assert_eq!(result.new_state.phase, Phase::Relearning);
        assert_eq!(result.new_state.lapses, 1);
    }

    #[test]
    fn relearning_recall_graduates_back_to_review() {
        let fsrs = Fsrs::default();
        let current = now();
        let mut state = review_state(2.0, 6.0, current);
        state.phase = Phase::Relearning;

        let result = fsrs.schedule(&state, Grade::Good, current);

        assert_eq!(result.new_state.phase, Phase::Review);
        assert_eq!(result.new_state.stability, fsrs.w[2]);
    }

    #[test]
    fn difficulty_never_leaves_bounds_under_extreme_streaks() {
        let fsrs = Fsrs::default();
        let current = now();

        let mut state = review_state(5.0, 5.0, current);
        for _ in 0..50 {
            state = fsrs.schedule(&state, Grade::Again, current).new_state;
            assert!(state.difficulty >= 1.0 && state.difficulty <= 10.0);
            state.phase = Phase::Review; // keep hammering the lapse branch
        }
        assert_eq!(state.difficulty, 10.0);

        let mut state = review_state(5.0, 5.0, current);
        for _ in 0..50 {
            state = fsrs.schedule(&state, Grade::Easy, current).new_state;
            assert!(state.difficulty >= 1.0 && state.difficulty <= 10.0);
        }
    }

    #[test]
    fn stability_never_drops_below_floor() {
        let fsrs = Fsrs::default();
        let current = now();

        let mut state = review_state(0.2, 10.0, current);
        for _ in 0..20 {
            state = fsrs.schedule(&state, Grade::Again, current).new_state;
            assert!(state.stability >= MIN_STABILITY);
            state.phase = Phase::Review;
        }
    }

    #[test]
    fn due_date_is_strictly_after_review_time() {
        let fsrs = Fsrs::default();
        let current = now();

        for grade in [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy] {
            let state = review_state(3.0, 5.0, current);
            let result = fsrs.schedule(&state, grade, current);
            assert!(result.next_due > current);
            assert!(result.new_state.scheduled_days >= 1);
            assert_eq!(result.new_state.due, result.next_due);
        }
    }

    #[test]
    fn interval_rounds_stability() {
        assert_eq!(Fsrs::interval_from_stability(0.1), 1);
        assert_eq!(Fsrs::interval_from_stability(1.0), 1);
        assert_eq!(Fsrs::interval_from_stability(2.0), 2);
        assert_eq!(Fsrs::interval_from_stability(10.0), 9);
    }

    #[test]
    fn elapsed_days_come_from_last_review() {
        let fsrs = Fsrs::default();
        let reviewed = now();
        let mut state = review_state(5.0, 5.0, reviewed);
        state.last_review = Some(reviewed - Duration::days(3));

        let result = fsrs.schedule(&state, Grade::Good, reviewed);

        assert_eq!(result.new_state.elapsed_days, 3);
    }

    #[test]
    fn first_review_has_zero_elapsed_days() {
        let fsrs = Fsrs::default();
        let current = now();
        let state = fsrs.initial_state(current);

        let result = fsrs.schedule(&state, Grade::Good, current);

        assert_eq!(result.new_state.elapsed_days, 0);
    }
}
