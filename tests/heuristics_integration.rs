//! Integration tests for timing heuristics
//!
//! - Total-time floor always fails with the elapsed time in the reason
//! - Regular spacing flagged as consistent and identical
//! - One fast interval is enough to fail

use snapgrid::core::{PuzzleInteraction, TimingHeuristics};
use snapgrid::types::{ClickAction, ClickEvent, ReasonCode, TimingRecord};

fn record_at(start: f64, clicks: &[f64], validation: f64) -> TimingRecord {
    let clicks = clicks
        .iter()
        .enumerate()
        .map(|(i, &timestamp)| ClickEvent {
            timestamp,
            cell_index: i,
            action: ClickAction::Select,
        })
        .collect();
    TimingRecord::new(start, clicks, validation)
}

// =============================================================================
// TOTAL TIME FLOOR
// =============================================================================

#[test]
fn test_total_time_floor_always_fails() {
    let heuristics = TimingHeuristics::new();
    for total in [0.0, 250.0, 900.0, 1500.0, 1999.0] {
        let rec = record_at(10_000.0, &[], 10_000.0 + total);
        let result = heuristics.assess(Some(&rec));
        assert!(!result.is_human, "total {}ms passed", total);

        let reason = result
            .findings
            .iter()
            .find(|f| f.code == ReasonCode::R102_TOTAL_TIME_TOO_SHORT)
            .map(|f| f.message.clone())
            .unwrap();
        let elapsed = format!("{:.2}s", total / 1000.0);
        assert!(reason.contains(&elapsed), "{} missing {}", reason, elapsed);
        assert!(reason.contains("2.0s"), "{} missing threshold", reason);
    }
}

#[test]
fn test_exactly_two_seconds_passes_floor() {
    let rec = record_at(0.0, &[800.0], 2000.0);
    let result = TimingHeuristics::new().assess(Some(&rec));
    assert!(!result.has(ReasonCode::R102_TOTAL_TIME_TOO_SHORT));
    assert!(result.is_human);
}

#[test]
fn test_exactly_three_hundred_seconds_is_not_excessive() {
    let rec = record_at(0.0, &[1000.0], 300_000.0);
    let result = TimingHeuristics::new().assess(Some(&rec));
    assert!(!result.has(ReasonCode::R103_TOTAL_TIME_EXCESSIVE));
    assert!(result.findings.is_empty(), "{:?}", result.reasons());

    let rec = record_at(0.0, &[1000.0], 300_500.0);
    let result = TimingHeuristics::new().assess(Some(&rec));
    assert!(result.has(ReasonCode::R103_TOTAL_TIME_EXCESSIVE));
    assert!(result.is_human, "ceiling is advisory only");
}

// =============================================================================
// CONSISTENT INTERVALS
// =============================================================================

#[test]
fn test_identical_spacing_flags_consistent_and_identical() {
    let rec = record_at(-2000.0, &[0.0, 250.0, 500.0, 750.0], 2000.0);
    let result = TimingHeuristics::new().assess(Some(&rec));

    assert!(!result.is_human);
    assert!(result.has(ReasonCode::R104_INTERVALS_TOO_CONSISTENT));
    assert!(result.has(ReasonCode::R106_INTERVALS_IDENTICAL));

    let reasons = result.reasons().join(" | ").to_lowercase();
    assert!(reasons.contains("consistent intervals"), "{}", reasons);
    assert!(reasons.contains("identical"), "{}", reasons);

    let stats = result.stats.unwrap();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.mean_ms, 250.0);
    assert_eq!(stats.cv, 0.0);
}

// =============================================================================
// FAST CLICKS
// =============================================================================

#[test]
fn test_single_fast_interval_fails() {
    // Human-like intervals except one 60ms double-tap
    let rec = record_at(0.0, &[1000.0, 1420.0, 1480.0, 2100.0, 2650.0], 4000.0);
    let result = TimingHeuristics::new().assess(Some(&rec));

    assert!(!result.is_human);
    assert!(result.has(ReasonCode::R105_INTERVALS_TOO_FAST));
    assert!(!result.has(ReasonCode::R106_INTERVALS_IDENTICAL));
    assert!(result.reasons().iter().any(|r| r.contains("1 interval(s)")));
}

#[test]
fn test_eighty_ms_is_not_too_fast() {
    let rec = record_at(0.0, &[1000.0, 1080.0], 3000.0);
    let result = TimingHeuristics::new().assess(Some(&rec));
    assert!(!result.has(ReasonCode::R105_INTERVALS_TOO_FAST));
}

// =============================================================================
// THINKING TIME
// =============================================================================

#[test]
fn test_exactly_five_hundred_ms_thinking_passes() {
    let rec = record_at(0.0, &[2000.0], 2500.0);
    let result = TimingHeuristics::new().assess(Some(&rec));
    assert!(!result.has(ReasonCode::R108_VALIDATED_TOO_FAST));
    assert!(result.is_human, "{:?}", result.reasons());

    let rec = record_at(0.0, &[2000.0], 2499.0);
    let result = TimingHeuristics::new().assess(Some(&rec));
    assert!(result.has(ReasonCode::R108_VALIDATED_TOO_FAST));
    assert!(!result.is_human);
}

// =============================================================================
// RECORDER → HEURISTICS
// =============================================================================

#[test]
fn test_recorded_interaction_feeds_heuristics() {
    let interaction = PuzzleInteraction::start(0.0)
        .record_click(3, 1000.0)
        .record_click(7, 1400.0)
        .record_click(3, 1950.0)
        .record_click(3, 2550.0);
    let rec = interaction.timing_record(3500.0);

    assert_eq!(rec.clicks[2].action, ClickAction::Deselect);
    assert_eq!(rec.clicks[3].action, ClickAction::Select);

    let result = TimingHeuristics::new().assess(Some(&rec));
    assert!(result.is_human, "{:?}", result.reasons());
}

#[test]
fn test_assessment_serializes() {
    let rec = record_at(0.0, &[100.0, 110.0], 300.0);
    let result = TimingHeuristics::new().assess(Some(&rec));
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["is_human"], false);
    assert_eq!(json["findings"][0]["code"], "R102_TOTAL_TIME_TOO_SHORT");
}
