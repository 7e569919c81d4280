//! Core types for Snapgrid

mod output;
mod puzzle;
mod reason;
mod state;
mod timing;
mod tolerance;

pub use output::{Outcome, ScoreResult, ValidationResult};
pub use puzzle::{CapturedFrame, CellIndex, Color, PuzzleData, Region, Shape, Target, Watermark};
pub use reason::ReasonCode;
pub use state::{AttemptState, ChallengeState};
pub use timing::{ClickAction, ClickEvent, HumanAssessment, IntervalStats, TimingFinding, TimingRecord};
pub use tolerance::{tier_for_attempt, ToleranceTier, TOLERANCE_TIERS};
