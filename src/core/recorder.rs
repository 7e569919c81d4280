//! Interaction recording: clock source and per-attempt click log

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::types::{CellIndex, ClickAction, ClickEvent, TimingRecord};

/// Monotonic millisecond clock
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Clock backed by `Instant`, immune to wall-clock adjustments
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for tests and scripted runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Mutex::new(start_ms),
        }
    }

    pub fn set(&self, ms: f64) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now = ms;
    }

    /// Move forward; negative steps are ignored to stay monotonic
    pub fn advance(&self, ms: f64) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += ms.max(0.0);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Selection and click log of one puzzle attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleInteraction {
    pub puzzle_start_time: f64,
    pub selection: BTreeSet<CellIndex>,
    pub clicks: Vec<ClickEvent>,
}

impl PuzzleInteraction {
    /// Fresh attempt, interactive from `now_ms`
    pub fn start(now_ms: f64) -> Self {
        Self {
            puzzle_start_time: now_ms,
            selection: BTreeSet::new(),
            clicks: Vec::new(),
        }
    }

    /// Toggle a cell and log the click
    pub fn record_click(mut self, cell: CellIndex, now_ms: f64) -> Self {
        let action = if self.selection.remove(&cell) {
            ClickAction::Deselect
        } else {
            self.selection.insert(cell);
            ClickAction::Select
        };
        self.clicks.push(ClickEvent {
            timestamp: now_ms,
            cell_index: cell,
            action,
        });
        self
    }

    /// Action of the most recent click
    pub fn last_action(&self) -> Option<ClickAction> {
        self.clicks.last().map(|c| c.action)
    }

    /// Freeze the attempt into a timing record at submit time
    pub fn timing_record(&self, validation_time: f64) -> TimingRecord {
        TimingRecord::new(self.puzzle_start_time, self.clicks.clone(), validation_time)
    }
}

/// Pure click transition: `(state, cell, now) -> state`
pub fn record_click(state: PuzzleInteraction, cell: CellIndex, now_ms: f64) -> PuzzleInteraction {
    state.record_click(cell, now_ms)
}
