//! Selection scorer: compares a selection against the correct set
//!
//! mistakes = wrong picks + missed correct cells. The tolerance tier for the
//! attempt decides how many mistakes and how much inaccuracy are allowed.

use std::collections::BTreeSet;

use crate::types::{tier_for_attempt, CellIndex, ScoreResult};

/// Score a selection for a 1-indexed attempt number
///
/// An empty correct set always fails.
pub fn score(selected: &BTreeSet<CellIndex>, correct: &BTreeSet<CellIndex>, attempt: u32) -> ScoreResult {
    let tier = tier_for_attempt(attempt);

    let correct_selected = selected.intersection(correct).count() as u32;
    let incorrect_selected = selected.len() as u32 - correct_selected;
    let missed_correct = correct.len() as u32 - correct_selected;
    let mistakes = incorrect_selected + missed_correct;

    let correct_accuracy = ratio(correct_selected, correct.len());
    let selection_accuracy = ratio(correct_selected, selected.len());

    let passed = if correct.is_empty() {
        false
    } else if tier.is_exact() {
        incorrect_selected == 0 && missed_correct == 0
    } else {
        mistakes <= tier.allowed_mistakes
            && correct_accuracy >= tier.min_correct_accuracy
            && selection_accuracy >= tier.min_selection_accuracy
    };

    ScoreResult {
        passed,
        mistakes,
        correct_selected,
        incorrect_selected,
        missed_correct,
        correct_accuracy,
        selection_accuracy,
        tier,
    }
}

fn ratio(numerator: u32, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(numerator) / denominator as f64
    }
}
