//! Output structures for scoring and validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ChallengeState, HumanAssessment, ReasonCode, ToleranceTier};

/// Scorer verdict for one selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub passed: bool,
    /// incorrect_selected + missed_correct
    pub mistakes: u32,
    pub correct_selected: u32,
    pub incorrect_selected: u32,
    pub missed_correct: u32,
    pub correct_accuracy: f64,
    pub selection_accuracy: f64,
    pub tier: ToleranceTier,
}

/// Final verdict of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Blocked,
}

impl Outcome {
    /// Session state this outcome leads to
    pub fn state(&self) -> ChallengeState {
        match self {
            Outcome::Pass => ChallengeState::Success,
            Outcome::Fail => ChallengeState::Failure,
            Outcome::Blocked => ChallengeState::Blocked,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Outcome::Pass => "PASS",
            Outcome::Fail => "FAIL",
            Outcome::Blocked => "BLOCKED",
        };
        write!(f, "{}", name)
    }
}

/// Output of one validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Wall-clock time of the decision (display only)
    pub timestamp: DateTime<Utc>,
    pub outcome: Outcome,
    /// Human-readable reasons, timing findings first
    pub reasons: Vec<String>,
    /// Machine-readable codes, parallel to the decision path
    pub codes: Vec<ReasonCode>,
    /// Attempt counter after this validation
    pub attempt_number: u32,
    pub blocked: bool,
    /// Tolerance tier in force for this submission
    pub tier: ToleranceTier,
    /// Absent when the timing gate or input checks failed first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<HumanAssessment>,
}

impl ValidationResult {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }

    pub fn mistakes(&self) -> Option<u32> {
        self.score.as_ref().map(|s| s.mistakes)
    }

    pub fn is_human(&self) -> Option<bool> {
        self.assessment.as_ref().map(|a| a.is_human)
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let state = self.outcome.state();
        format!(
            "{}{} {}{}",
            state.color_code(),
            state.emoji(),
            self.to_parseable_string(),
            ChallengeState::color_reset()
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        let mistakes = self
            .mistakes()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        let codes: Vec<&str> = self.codes.iter().map(|c| c.code()).collect();
        format!(
            "outcome={} | mistakes={} | attempt={} | blocked={} | reasons={}",
            self.outcome,
            mistakes,
            self.attempt_number,
            self.blocked,
            codes.join(",")
        )
    }
}
