//! Challenge session: attempt counting, blocking and reset semantics
//!
//! State transitions:
//! - CAMERA → PUZZLE: frame captured, fresh puzzle generated
//! - PUZZLE → SUCCESS | FAILURE | BLOCKED: submission validated
//! - SUCCESS | FAILURE → CAMERA: retry (attempt counter kept)
//! - any → CAMERA: new challenge (attempt counter cleared)
//!
//! The timing gate runs before scoring. A timing failure never reaches the
//! scorer and does not consume an attempt.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{info, warn};

use crate::config::SnapgridConfig;
use crate::core::generator::PuzzleGenerator;
use crate::core::heuristics::TimingHeuristics;
use crate::core::recorder::PuzzleInteraction;
use crate::core::scorer::score;
use crate::types::{
    tier_for_attempt, AttemptState, CapturedFrame, CellIndex, ChallengeState, ClickAction, HumanAssessment,
    Outcome, PuzzleData, ReasonCode, ScoreResult, TimingRecord, ToleranceTier, ValidationResult,
};
use crate::{Result, SnapgridError};

/// Everything a validation looks at
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub puzzle: Option<&'a PuzzleData>,
    pub frame: Option<&'a CapturedFrame>,
    pub selection: &'a BTreeSet<CellIndex>,
    pub timing: Option<&'a TimingRecord>,
    /// Wall-clock stamp for the result, display only
    pub decided_at: DateTime<Utc>,
}

/// Validate a submission against the current attempt state
///
/// Returns the verdict and the attempt state to carry forward. Malformed
/// input fails closed without consuming an attempt. Same inputs, same output.
pub fn validate_submission(
    submission: &Submission<'_>,
    attempts: AttemptState,
    heuristics: &TimingHeuristics,
    max_attempts: u32,
) -> (ValidationResult, AttemptState) {
    let mut verdict = Verdict::new(submission.decided_at, tier_for_attempt(attempts.effective_attempt()));

    if attempts.blocked {
        verdict.push(ReasonCode::R304_ATTEMPTS_EXHAUSTED, "Too many failed attempts");
        return (verdict.finish(Outcome::Blocked, attempts), attempts);
    }

    if let Some(reason) = input_problem(submission) {
        warn!(code = reason.code(), "rejecting malformed submission");
        verdict.push(reason, reason.description());
        return (verdict.finish(Outcome::Fail, attempts), attempts);
    }

    let assessment = heuristics.assess(submission.timing);
    for finding in &assessment.findings {
        verdict.push(finding.code, finding.message.clone());
    }
    let is_human = assessment.is_human;
    verdict.assessment = Some(assessment);
    if !is_human {
        info!("timing gate rejected submission");
        return (verdict.finish(Outcome::Fail, attempts), attempts);
    }

    // input_problem guarantees the puzzle is present
    let correct = submission.puzzle.map(|p| p.correct_set()).unwrap_or_default();
    let result = score(submission.selection, &correct, attempts.effective_attempt());

    if correct.is_empty() {
        verdict.push(ReasonCode::R203_PUZZLE_DEGENERATE, "Puzzle has no correct cells");
    }

    let (outcome, next) = if result.passed {
        verdict.push(
            ReasonCode::R201_SELECTION_ACCEPTED,
            format!("Selection accepted with {} mistake(s)", result.mistakes),
        );
        (Outcome::Pass, AttemptState::default())
    } else {
        verdict.push(
            ReasonCode::R202_SELECTION_REJECTED,
            format!(
                "Selection rejected: {} mistake(s), {}",
                result.mistakes,
                result.tier.describe().to_lowercase()
            ),
        );
        let attempt_number = attempts.attempt_number + 1;
        if attempt_number >= max_attempts {
            warn!(attempt_number, "attempt limit reached, blocking");
            verdict.push(ReasonCode::R304_ATTEMPTS_EXHAUSTED, "Too many failed attempts");
            (
                Outcome::Blocked,
                AttemptState {
                    attempt_number,
                    blocked: true,
                },
            )
        } else {
            (
                Outcome::Fail,
                AttemptState {
                    attempt_number,
                    blocked: false,
                },
            )
        }
    };

    verdict.score = Some(result);
    (verdict.finish(outcome, next), next)
}

fn input_problem(submission: &Submission<'_>) -> Option<ReasonCode> {
    match submission.frame {
        None => return Some(ReasonCode::R301_CAPTURE_MISSING),
        Some(frame) if !frame.is_well_formed() => return Some(ReasonCode::R302_CAPTURE_MALFORMED),
        Some(_) => {}
    }
    if submission.puzzle.is_none() {
        return Some(ReasonCode::R303_PUZZLE_MISSING);
    }
    None
}

/// Accumulates reasons while a validation runs
struct Verdict {
    decided_at: DateTime<Utc>,
    tier: ToleranceTier,
    reasons: Vec<String>,
    codes: Vec<ReasonCode>,
    score: Option<ScoreResult>,
    assessment: Option<HumanAssessment>,
}

impl Verdict {
    fn new(decided_at: DateTime<Utc>, tier: ToleranceTier) -> Self {
        Self {
            decided_at,
            tier,
            reasons: Vec::new(),
            codes: Vec::new(),
            score: None,
            assessment: None,
        }
    }

    fn push(&mut self, code: ReasonCode, reason: impl Into<String>) {
        self.codes.push(code);
        self.reasons.push(reason.into());
    }

    fn finish(self, outcome: Outcome, attempts: AttemptState) -> ValidationResult {
        ValidationResult {
            timestamp: self.decided_at,
            outcome,
            reasons: self.reasons,
            codes: self.codes,
            attempt_number: attempts.attempt_number,
            blocked: attempts.blocked,
            tier: self.tier,
            score: self.score,
            assessment: self.assessment,
        }
    }
}

/// One challenge lineage, owned by whatever drives the UI event loop
#[derive(Debug)]
pub struct ChallengeSession<R: Rng> {
    config: SnapgridConfig,
    generator: PuzzleGenerator,
    heuristics: TimingHeuristics,
    rng: R,
    state: ChallengeState,
    attempts: AttemptState,
    frame: Option<CapturedFrame>,
    puzzle: Option<PuzzleData>,
    interaction: Option<PuzzleInteraction>,
    last_result: Option<ValidationResult>,
}

impl<R: Rng> ChallengeSession<R> {
    /// Create a session in CAMERA state with a caller-supplied RNG
    pub fn new(config: SnapgridConfig, rng: R) -> Self {
        let heuristics = TimingHeuristics::with_config(config.heuristics.clone());
        Self {
            config,
            generator: PuzzleGenerator::new(),
            heuristics,
            rng,
            state: ChallengeState::Camera,
            attempts: AttemptState::default(),
            frame: None,
            puzzle: None,
            interaction: None,
            last_result: None,
        }
    }

    /// Frame delivered by the camera layer: generate a puzzle and start timing
    pub fn capture(&mut self, frame: CapturedFrame, now_ms: f64) -> Result<&PuzzleData> {
        self.require(ChallengeState::Camera, "capture")?;

        let puzzle = self
            .generator
            .generate(self.config.rows, self.config.cols, &mut self.rng)?;
        info!(
            attempt = self.attempts.effective_attempt(),
            target = %puzzle.target,
            "puzzle ready"
        );

        self.frame = Some(frame);
        self.interaction = Some(PuzzleInteraction::start(now_ms));
        self.state = ChallengeState::Puzzle;
        Ok(self.puzzle.insert(puzzle))
    }

    /// Toggle a cell on the current puzzle
    pub fn toggle_cell(&mut self, cell: CellIndex, now_ms: f64) -> Result<ClickAction> {
        self.require(ChallengeState::Puzzle, "select a cell")?;

        let cells = self.puzzle.as_ref().map(|p| p.cell_count()).unwrap_or(0);
        if cell >= cells {
            return Err(SnapgridError::CellOutOfRange { cell, cells });
        }

        let interaction = self
            .interaction
            .take()
            .unwrap_or_else(|| PuzzleInteraction::start(now_ms))
            .record_click(cell, now_ms);
        let action = interaction.last_action().unwrap_or(ClickAction::Select);
        self.interaction = Some(interaction);
        Ok(action)
    }

    /// Submit the recorded selection at `now_ms`
    pub fn validate(&mut self, now_ms: f64) -> Result<&ValidationResult> {
        self.require(ChallengeState::Puzzle, "validate")?;

        let (selection, record) = match &self.interaction {
            Some(i) => (i.selection.clone(), Some(i.timing_record(now_ms))),
            None => (BTreeSet::new(), None),
        };
        self.submit(&selection, record.as_ref())
    }

    /// Submit a selection and timing record recorded by the host
    pub fn submit(
        &mut self,
        selection: &BTreeSet<CellIndex>,
        timing: Option<&TimingRecord>,
    ) -> Result<&ValidationResult> {
        self.require(ChallengeState::Puzzle, "validate")?;

        let submission = Submission {
            puzzle: self.puzzle.as_ref(),
            frame: self.frame.as_ref(),
            selection,
            timing,
            decided_at: Utc::now(),
        };
        let (result, attempts) =
            validate_submission(&submission, self.attempts, &self.heuristics, self.config.max_attempts);

        info!(
            outcome = %result.outcome,
            attempt_number = attempts.attempt_number,
            blocked = attempts.blocked,
            "submission validated"
        );

        self.attempts = attempts;
        self.state = result.outcome.state();
        Ok(self.last_result.insert(result))
    }

    /// Soft reset: back to CAMERA for a stricter attempt
    pub fn retry(&mut self) -> Result<()> {
        if !matches!(self.state, ChallengeState::Success | ChallengeState::Failure) || self.attempts.blocked {
            return Err(SnapgridError::IllegalTransition {
                action: "retry",
                state: self.state,
            });
        }
        self.clear_attempt();
        info!(attempt = self.attempts.effective_attempt(), "retrying challenge");
        Ok(())
    }

    /// Full reset: clears the attempt counter and any block
    pub fn new_challenge(&mut self) {
        self.clear_attempt();
        self.attempts = AttemptState::default();
        info!("new challenge");
    }

    fn clear_attempt(&mut self) {
        self.frame = None;
        self.puzzle = None;
        self.interaction = None;
        self.last_result = None;
        self.state = ChallengeState::Camera;
    }

    fn require(&self, expected: ChallengeState, action: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SnapgridError::IllegalTransition {
                action,
                state: self.state,
            })
        }
    }

    pub fn state(&self) -> ChallengeState {
        self.state
    }

    pub fn attempts(&self) -> AttemptState {
        self.attempts
    }

    pub fn is_blocked(&self) -> bool {
        self.attempts.blocked
    }

    pub fn puzzle(&self) -> Option<&PuzzleData> {
        self.puzzle.as_ref()
    }

    pub fn frame(&self) -> Option<&CapturedFrame> {
        self.frame.as_ref()
    }

    /// Cells currently selected
    pub fn selection(&self) -> Option<&BTreeSet<CellIndex>> {
        self.interaction.as_ref().map(|i| &i.selection)
    }

    pub fn interaction(&self) -> Option<&PuzzleInteraction> {
        self.interaction.as_ref()
    }

    pub fn last_result(&self) -> Option<&ValidationResult> {
        self.last_result.as_ref()
    }

    /// Tier the next submission will be scored against
    pub fn current_tier(&self) -> ToleranceTier {
        tier_for_attempt(self.attempts.effective_attempt())
    }

    pub fn config(&self) -> &SnapgridConfig {
        &self.config
    }
}
