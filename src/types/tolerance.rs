//! Tolerance tiers: how forgiving scoring is on each attempt
//!
//! Single source of truth for the scorer and for any UI copy describing the
//! rules.

use serde::{Deserialize, Serialize};

/// Mistake allowance for one attempt number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceTier {
    /// 1-indexed attempt this tier applies to
    pub attempt: u32,
    pub allowed_mistakes: u32,
    /// Minimum correct_selected / |correct|
    pub min_correct_accuracy: f64,
    /// Minimum correct_selected / |selected|
    pub min_selection_accuracy: f64,
}

impl ToleranceTier {
    /// Does this tier demand an exact match?
    pub fn is_exact(&self) -> bool {
        self.allowed_mistakes == 0
    }

    /// UI copy for this tier
    pub fn describe(&self) -> String {
        if self.is_exact() {
            "Select exactly the matching cells".to_string()
        } else {
            format!(
                "Up to {} mistake{} allowed, {:.0}% accuracy required",
                self.allowed_mistakes,
                if self.allowed_mistakes == 1 { "" } else { "s" },
                self.min_correct_accuracy.min(self.min_selection_accuracy) * 100.0
            )
        }
    }
}

/// Attempts beyond the table reuse the last (strictest) tier
pub const TOLERANCE_TIERS: [ToleranceTier; 3] = [
    ToleranceTier {
        attempt: 1,
        allowed_mistakes: 2,
        min_correct_accuracy: 0.8,
        min_selection_accuracy: 0.8,
    },
    ToleranceTier {
        attempt: 2,
        allowed_mistakes: 1,
        min_correct_accuracy: 0.9,
        min_selection_accuracy: 0.9,
    },
    ToleranceTier {
        attempt: 3,
        allowed_mistakes: 0,
        min_correct_accuracy: 1.0,
        min_selection_accuracy: 1.0,
    },
];

/// Tier for a 1-indexed attempt number (0 is treated as 1)
pub fn tier_for_attempt(attempt: u32) -> ToleranceTier {
    let index = (attempt.max(1) as usize - 1).min(TOLERANCE_TIERS.len() - 1);
    TOLERANCE_TIERS[index]
}
