//! Snapgrid: camera-grid human verification engine
//!
//! A captured frame is overlaid with a grid of shape/color watermarks. The
//! user clicks the cells matching a target, and the submission is gated by
//! timing heuristics before the selection is scored against a tolerance tier
//! that tightens with every failed attempt.
//!
//! A client-side verdict is advisory; the HTTP host keeps sessions and
//! timestamps on the server.

pub mod config;
pub mod core;
pub mod error;
pub mod types;

pub use config::{HeuristicsConfig, ServerConfig, SnapgridConfig};
pub use error::{Result, SnapgridError};

// =============================================================================
// GRID
// =============================================================================

/// Default grid rows
pub const DEFAULT_ROWS: usize = 4;

/// Default grid columns
pub const DEFAULT_COLS: usize = 4;

/// Failed scoring attempts before the challenge lineage is blocked
pub const MAX_ATTEMPTS: u32 = 3;

// =============================================================================
// TIMING THRESHOLDS [C] - empirical, tunable via HeuristicsConfig
// =============================================================================

/// Total puzzle time below this is too fast for a human (seconds)
pub const MIN_TOTAL_TIME_SECS: f64 = 2.0;

/// Total puzzle time above this is flagged, but not failed (seconds)
pub const MAX_TOTAL_TIME_SECS: f64 = 300.0;

/// Coefficient of variation below this means intervals are too regular
pub const MIN_INTERVAL_CV: f64 = 0.15;

/// Intervals needed before the CV and identical-interval checks apply
pub const MIN_INTERVALS_FOR_CONSISTENCY: usize = 3;

/// Any click interval below this is too fast (milliseconds)
pub const MIN_CLICK_INTERVAL_MS: f64 = 80.0;

/// Time between first click and submit below this is too fast (milliseconds)
pub const MIN_THINKING_TIME_MS: f64 = 500.0;

// =============================================================================
// SERVER
// =============================================================================

/// Hosted sessions untouched for longer than this are evicted (seconds)
pub const SESSION_TTL_SECS: f64 = 600.0;

/// Most sessions the HTTP host keeps; the least recently used goes first
pub const MAX_SESSIONS: usize = 10_000;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
