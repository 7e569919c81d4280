//! Interaction timing record and heuristic assessment types

use serde::{Deserialize, Serialize};

use crate::types::{CellIndex, ReasonCode};

/// Whether a click added or removed a cell from the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickAction {
    Select,
    Deselect,
}

/// One cell toggle, stamped with a monotonic clock (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub timestamp: f64,
    pub cell_index: CellIndex,
    pub action: ClickAction,
}

/// Timing of one puzzle attempt, handed to the heuristics on submit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingRecord {
    /// When the puzzle became interactive
    pub puzzle_start_time: f64,
    /// Clicks in chronological order
    pub clicks: Vec<ClickEvent>,
    /// When the user submitted
    pub validation_time: f64,
}

impl TimingRecord {
    pub fn new(puzzle_start_time: f64, clicks: Vec<ClickEvent>, validation_time: f64) -> Self {
        Self {
            puzzle_start_time,
            clicks,
            validation_time,
        }
    }

    /// Time from puzzle start to submit
    pub fn total_time_ms(&self) -> f64 {
        self.validation_time - self.puzzle_start_time
    }

    /// Every timestamp is a finite number
    pub fn is_finite(&self) -> bool {
        self.puzzle_start_time.is_finite()
            && self.validation_time.is_finite()
            && self.clicks.iter().all(|c| c.timestamp.is_finite())
    }

    /// Deltas between consecutive clicks
    pub fn intervals(&self) -> Vec<f64> {
        self.clicks
            .windows(2)
            .map(|w| w[1].timestamp - w[0].timestamp)
            .collect()
    }
}

/// Summary statistics over click intervals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalStats {
    pub count: usize,
    pub mean_ms: f64,
    /// Population standard deviation
    pub std_dev_ms: f64,
    /// Coefficient of variation (std_dev / mean)
    pub cv: f64,
}

impl IntervalStats {
    /// Compute over a slice of intervals. None when empty.
    pub fn from_intervals(intervals: &[f64]) -> Option<Self> {
        if intervals.is_empty() {
            return None;
        }
        let n = intervals.len() as f64;
        let mean = intervals.iter().sum::<f64>() / n;
        let variance = intervals.iter().map(|i| (i - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        // Zero mean means every interval is zero, which is perfectly regular
        let cv = if mean > 0.0 { std_dev / mean } else { 0.0 };

        Some(Self {
            count: intervals.len(),
            mean_ms: mean,
            std_dev_ms: std_dev,
            cv,
        })
    }
}

/// One heuristic observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingFinding {
    pub code: ReasonCode,
    pub message: String,
}

impl TimingFinding {
    pub fn new(code: ReasonCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Warnings are reported but never fail the assessment
    pub fn is_warning(&self) -> bool {
        self.code.is_warning()
    }
}

impl std::fmt::Display for TimingFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

/// Result of running every timing heuristic over a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanAssessment {
    pub is_human: bool,
    pub findings: Vec<TimingFinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<IntervalStats>,
}

impl HumanAssessment {
    /// Human-readable reasons, one per finding
    pub fn reasons(&self) -> Vec<String> {
        self.findings.iter().map(|f| f.message.clone()).collect()
    }

    pub fn has(&self, code: ReasonCode) -> bool {
        self.findings.iter().any(|f| f.code == code)
    }
}
