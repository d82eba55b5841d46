//! Answer grading for typed practice turns.
//!
//! A typed answer is compared against the target word and bucketed into
//! one of three verdicts. `Close` marks a near-miss the caller should let
//! the user retry without advancing or penalizing the card.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Similarity above this (strictly) counts as a near-miss instead of a
/// plain wrong answer.
pub const CLOSE_THRESHOLD: f64 = 0.4;

/// Qualitative outcome of one typed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Close,
    Wrong,
}

/// Verdict plus the similarity score that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Judgement {
    pub verdict: Verdict,
    /// Normalized edit-distance similarity, 0.0..=1.0.
    pub similarity: f64,
}

/// Grade a typed answer against the target word.
///
/// Both sides are trimmed and lowercased before comparison. An empty
/// target word is a caller error, not a gradeable answer.
pub fn grade(typed: &str, target: &str) -> Result<Judgement> {
    if target.trim().is_empty() {
        return Err(CoreError::EmptyTargetWord);
    }

    let typed = typed.trim().to_lowercase();
    let target = target.trim().to_lowercase();

    if typed == target {
        return Ok(Judgement {
            verdict: Verdict::Correct,
            similarity: 1.0,
        });
    }

    let similarity = normalized_similarity(&typed, &target);
    let verdict = if similarity > CLOSE_THRESHOLD {
        Verdict::Close
    } else {
        Verdict::Wrong
    };

    Ok(Judgement { verdict, similarity })
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows instead of the full matrix.
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Normalized similarity (0.0 to 1.0) based on Levenshtein distance.
/// Lengths are counted in chars, matching the distance metric.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0; // Both empty strings are identical
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}
