//! Challenge session state definitions

use serde::{Deserialize, Serialize};

/// The states of a challenge session
///
/// `Success`, `Failure` and `Blocked` are the three branches of the result
/// screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeState {
    /// Waiting for a captured frame
    Camera,
    /// Puzzle shown, user is selecting cells
    Puzzle,
    /// Last submission passed
    Success,
    /// Last submission failed, retry allowed
    Failure,
    /// Too many failures, only a new challenge exits
    Blocked,
}

impl ChallengeState {
    /// Is this one of the result branches?
    pub fn is_result(&self) -> bool {
        matches!(
            self,
            ChallengeState::Success | ChallengeState::Failure | ChallengeState::Blocked
        )
    }

    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            ChallengeState::Camera => "\x1b[90m",  // Gray
            ChallengeState::Puzzle => "\x1b[36m",  // Cyan
            ChallengeState::Success => "\x1b[32m", // Green
            ChallengeState::Failure => "\x1b[33m", // Yellow
            ChallengeState::Blocked => "\x1b[31m", // Red
        }
    }

    /// Reset ANSI color
    pub fn color_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Get emoji for state
    pub fn emoji(&self) -> &'static str {
        match self {
            ChallengeState::Camera => "📷",
            ChallengeState::Puzzle => "🧩",
            ChallengeState::Success => "✅",
            ChallengeState::Failure => "⚠️",
            ChallengeState::Blocked => "⛔",
        }
    }
}

impl std::fmt::Display for ChallengeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChallengeState::Camera => "CAMERA",
            ChallengeState::Puzzle => "PUZZLE",
            ChallengeState::Success => "SUCCESS",
            ChallengeState::Failure => "FAILURE",
            ChallengeState::Blocked => "BLOCKED",
        };
        write!(f, "{}", name)
    }
}

/// Attempt counter carried across puzzle regenerations of one lineage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptState {
    /// Failed scoring attempts since the last success or full reset
    pub attempt_number: u32,
    /// Locked until a full reset
    pub blocked: bool,
}

impl AttemptState {
    /// Tolerance tier the next submission is scored against (1-indexed)
    pub fn effective_attempt(&self) -> u32 {
        self.attempt_number + 1
    }
}
