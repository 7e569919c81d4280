//! Error types for caller contract violations
//!
//! Verification failures are not errors: they come back as an `Outcome`.

use thiserror::Error;

use crate::types::ChallengeState;

/// Result type for snapgrid operations
pub type Result<T> = std::result::Result<T, SnapgridError>;

#[derive(Error, Debug)]
pub enum SnapgridError {
    /// Grid needs at least two cells so one watermark exists
    #[error("grid {rows}x{cols} is too small, need at least 2 cells")]
    GridTooSmall { rows: usize, cols: usize },

    /// Clicked cell does not exist on the grid
    #[error("cell {cell} is outside the grid ({cells} cells)")]
    CellOutOfRange { cell: usize, cells: usize },

    /// Session transition not allowed from the current state
    #[error("cannot {action} while in state {state}")]
    IllegalTransition {
        action: &'static str,
        state: ChallengeState,
    },

    /// Configuration is invalid
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
