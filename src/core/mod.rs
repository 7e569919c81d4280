//! Core modules for Snapgrid

pub mod api;
pub mod generator;
pub mod heuristics;
pub mod recorder;
pub mod scorer;
pub mod session;

pub use api::{create_router, create_router_with_state, run_server, AppState, SessionEntry};
pub use generator::PuzzleGenerator;
pub use heuristics::TimingHeuristics;
pub use recorder::{record_click, Clock, ManualClock, MonotonicClock, PuzzleInteraction};
pub use scorer::score;
pub use session::{validate_submission, ChallengeSession, Submission};

use rand::Rng;

use crate::types::PuzzleData;
use crate::Result;

/// Generate a fresh puzzle for a `rows x cols` grid
pub fn generate_puzzle<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Result<PuzzleData> {
    PuzzleGenerator::new().generate(rows, cols, rng)
}
