//! Reason codes for verification decisions

use serde::{Deserialize, Serialize};

/// Reason codes for every finding and outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // R1xx: Timing heuristics
    // =========================================================================
    /// No timing record supplied
    R101_TIMING_MISSING,
    /// Puzzle solved faster than the total-time floor
    R102_TOTAL_TIME_TOO_SHORT,
    /// Puzzle open longer than the ceiling (warning)
    R103_TOTAL_TIME_EXCESSIVE,
    /// Click intervals vary too little
    R104_INTERVALS_TOO_CONSISTENT,
    /// At least one click interval below the floor
    R105_INTERVALS_TOO_FAST,
    /// All click intervals round to the same millisecond
    R106_INTERVALS_IDENTICAL,
    /// Submitted without clicking anything (warning)
    R107_NO_CLICKS,
    /// Submitted too soon after the first click
    R108_VALIDATED_TOO_FAST,
    /// Timing record holds a non-finite timestamp
    R109_TIMING_MALFORMED,

    // =========================================================================
    // R2xx: Selection scoring
    // =========================================================================
    /// Selection within the tolerance tier
    R201_SELECTION_ACCEPTED,
    /// Selection outside the tolerance tier
    R202_SELECTION_REJECTED,
    /// Puzzle has no correct cells
    R203_PUZZLE_DEGENERATE,

    // =========================================================================
    // R3xx: Input and session
    // =========================================================================
    /// No captured frame
    R301_CAPTURE_MISSING,
    /// Captured frame has no image or an invalid region
    R302_CAPTURE_MALFORMED,
    /// No puzzle to validate against
    R303_PUZZLE_MISSING,
    /// Attempt limit reached, lineage blocked
    R304_ATTEMPTS_EXHAUSTED,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R101_TIMING_MISSING => "R101_TIMING_MISSING",
            Self::R102_TOTAL_TIME_TOO_SHORT => "R102_TOTAL_TIME_TOO_SHORT",
            Self::R103_TOTAL_TIME_EXCESSIVE => "R103_TOTAL_TIME_EXCESSIVE",
            Self::R104_INTERVALS_TOO_CONSISTENT => "R104_INTERVALS_TOO_CONSISTENT",
            Self::R105_INTERVALS_TOO_FAST => "R105_INTERVALS_TOO_FAST",
            Self::R106_INTERVALS_IDENTICAL => "R106_INTERVALS_IDENTICAL",
            Self::R107_NO_CLICKS => "R107_NO_CLICKS",
            Self::R108_VALIDATED_TOO_FAST => "R108_VALIDATED_TOO_FAST",
            Self::R109_TIMING_MALFORMED => "R109_TIMING_MALFORMED",
            Self::R201_SELECTION_ACCEPTED => "R201_SELECTION_ACCEPTED",
            Self::R202_SELECTION_REJECTED => "R202_SELECTION_REJECTED",
            Self::R203_PUZZLE_DEGENERATE => "R203_PUZZLE_DEGENERATE",
            Self::R301_CAPTURE_MISSING => "R301_CAPTURE_MISSING",
            Self::R302_CAPTURE_MALFORMED => "R302_CAPTURE_MALFORMED",
            Self::R303_PUZZLE_MISSING => "R303_PUZZLE_MISSING",
            Self::R304_ATTEMPTS_EXHAUSTED => "R304_ATTEMPTS_EXHAUSTED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R101_TIMING_MISSING => "No timing data",
            Self::R102_TOTAL_TIME_TOO_SHORT => "Completed too fast",
            Self::R103_TOTAL_TIME_EXCESSIVE => "Puzzle open unusually long",
            Self::R104_INTERVALS_TOO_CONSISTENT => "Click intervals too consistent",
            Self::R105_INTERVALS_TOO_FAST => "Clicks too fast",
            Self::R106_INTERVALS_IDENTICAL => "Identical click intervals",
            Self::R107_NO_CLICKS => "No clicks recorded",
            Self::R108_VALIDATED_TOO_FAST => "Validated too fast after first click",
            Self::R109_TIMING_MALFORMED => "Timing data malformed",
            Self::R201_SELECTION_ACCEPTED => "Selection accepted",
            Self::R202_SELECTION_REJECTED => "Selection rejected",
            Self::R203_PUZZLE_DEGENERATE => "Puzzle has no correct cells",
            Self::R301_CAPTURE_MISSING => "No captured image",
            Self::R302_CAPTURE_MALFORMED => "Captured image or region invalid",
            Self::R303_PUZZLE_MISSING => "No puzzle data",
            Self::R304_ATTEMPTS_EXHAUSTED => "Too many failed attempts",
        }
    }

    /// Advisory findings that never fail an assessment
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::R103_TOTAL_TIME_EXCESSIVE | Self::R107_NO_CLICKS)
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
