//! Timing heuristics: flags interaction timing inconsistent with a human
//!
//! Checks, in order:
//! 1. Record present and every timestamp finite (otherwise fail immediately)
//! 2. Total time above the floor
//! 3. Total time below the ceiling (warning only)
//! 4. Click intervals: CV floor, per-interval floor, identical intervals
//! 5. At least one click (warning only)
//! 6. Thinking time between first click and submit
//!
//! Every check after the first runs, so the findings list is exhaustive.

use tracing::debug;

use crate::config::HeuristicsConfig;
use crate::types::{HumanAssessment, IntervalStats, ReasonCode, TimingFinding, TimingRecord};

/// Timing heuristics engine
#[derive(Debug, Clone, Default)]
pub struct TimingHeuristics {
    config: HeuristicsConfig,
}

impl TimingHeuristics {
    /// Create with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HeuristicsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HeuristicsConfig {
        &self.config
    }

    /// Assess a timing record. Pure: same record, same assessment.
    pub fn assess(&self, record: Option<&TimingRecord>) -> HumanAssessment {
        let record = match record {
            Some(r) => r,
            None => {
                return HumanAssessment {
                    is_human: false,
                    findings: vec![TimingFinding::new(ReasonCode::R101_TIMING_MISSING, "no timing data")],
                    stats: None,
                }
            }
        };

        if !record.is_finite() {
            return HumanAssessment {
                is_human: false,
                findings: vec![TimingFinding::new(
                    ReasonCode::R109_TIMING_MALFORMED,
                    "malformed timing data: non-finite timestamp",
                )],
                stats: None,
            };
        }

        let cfg = &self.config;
        let mut findings = Vec::new();

        let total_secs = record.total_time_ms() / 1000.0;
        if total_secs < cfg.min_total_time_secs {
            findings.push(TimingFinding::new(
                ReasonCode::R102_TOTAL_TIME_TOO_SHORT,
                format!(
                    "Completed too fast: {:.2}s (minimum {:.1}s)",
                    total_secs, cfg.min_total_time_secs
                ),
            ));
        }
        if total_secs > cfg.max_total_time_secs {
            findings.push(TimingFinding::new(
                ReasonCode::R103_TOTAL_TIME_EXCESSIVE,
                format!(
                    "Puzzle open unusually long: {:.1}s (over {:.0}s)",
                    total_secs, cfg.max_total_time_secs
                ),
            ));
        }

        let intervals = record.intervals();
        let stats = IntervalStats::from_intervals(&intervals);
        if let Some(stats) = stats {
            debug!(
                intervals = stats.count,
                mean_ms = stats.mean_ms,
                std_dev_ms = stats.std_dev_ms,
                cv = stats.cv,
                "click interval stats"
            );
            self.check_intervals(&intervals, &stats, &mut findings);
        }

        match record.clicks.first() {
            None => findings.push(TimingFinding::new(ReasonCode::R107_NO_CLICKS, "No clicks recorded")),
            Some(first) => {
                let thinking_ms = record.validation_time - first.timestamp;
                if thinking_ms < cfg.min_thinking_time_ms {
                    findings.push(TimingFinding::new(
                        ReasonCode::R108_VALIDATED_TOO_FAST,
                        format!(
                            "Validated too fast after first click: {:.0}ms (minimum {:.0}ms)",
                            thinking_ms, cfg.min_thinking_time_ms
                        ),
                    ));
                }
            }
        }

        HumanAssessment {
            is_human: findings.iter().all(|f| f.is_warning()),
            findings,
            stats,
        }
    }

    fn check_intervals(&self, intervals: &[f64], stats: &IntervalStats, findings: &mut Vec<TimingFinding>) {
        let cfg = &self.config;
        let enough = intervals.len() >= cfg.min_intervals_for_consistency;

        if enough && stats.cv < cfg.min_interval_cv {
            findings.push(TimingFinding::new(
                ReasonCode::R104_INTERVALS_TOO_CONSISTENT,
                format!(
                    "Suspiciously consistent intervals: CV {:.3} < {:.2}",
                    stats.cv, cfg.min_interval_cv
                ),
            ));
        }

        let too_fast = intervals
            .iter()
            .filter(|&&i| i < cfg.min_click_interval_ms)
            .count();
        if too_fast > 0 {
            findings.push(TimingFinding::new(
                ReasonCode::R105_INTERVALS_TOO_FAST,
                format!(
                    "Clicks too fast: {} interval(s) under {:.0}ms",
                    too_fast, cfg.min_click_interval_ms
                ),
            ));
        }

        let first = intervals[0].round();
        if enough && intervals.iter().all(|i| i.round() == first) {
            findings.push(TimingFinding::new(
                ReasonCode::R106_INTERVALS_IDENTICAL,
                format!("Identical click intervals: all {}ms", first as i64),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClickAction, ClickEvent};

    fn record(start: f64, clicks: &[f64], validation: f64) -> TimingRecord {
        let clicks = clicks
            .iter()
            .enumerate()
            .map(|(i, &t)| ClickEvent {
                timestamp: t,
                cell_index: i,
                action: ClickAction::Select,
            })
            .collect();
        TimingRecord::new(start, clicks, validation)
    }

    #[test]
    fn test_missing_record_short_circuits() {
        let result = TimingHeuristics::new().assess(None);
        assert!(!result.is_human);
        assert_eq!(result.reasons(), vec!["no timing data".to_string()]);
    }

    #[test]
    fn test_non_finite_record_fails_closed() {
        let heuristics = TimingHeuristics::new();
        let records = [
            TimingRecord::new(0.0, vec![], f64::NAN),
            TimingRecord::new(f64::NAN, vec![], 3000.0),
            TimingRecord::new(0.0, vec![], f64::INFINITY),
            record(0.0, &[1000.0, f64::NAN, 1950.0], 3500.0),
        ];
        for rec in &records {
            let result = heuristics.assess(Some(rec));
            assert!(!result.is_human, "{:?} passed", rec);
            assert!(result.has(ReasonCode::R109_TIMING_MALFORMED));
            assert_eq!(result.findings.len(), 1);
            assert!(result.stats.is_none());
        }
    }

    #[test]
    fn test_human_like_record_passes() {
        let rec = record(0.0, &[1000.0, 1400.0, 1950.0, 2550.0], 3500.0);
        let result = TimingHeuristics::new().assess(Some(&rec));
        assert!(result.is_human, "unexpected findings: {:?}", result.reasons());
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_total_time_floor() {
        let rec = record(0.0, &[300.0], 1999.0);
        let result = TimingHeuristics::new().assess(Some(&rec));
        assert!(!result.is_human);
        assert!(result.has(ReasonCode::R102_TOTAL_TIME_TOO_SHORT));
        let reason = &result.reasons()[0];
        assert!(reason.contains("2.00s") || reason.contains("1.99s"), "{}", reason);
        assert!(reason.contains("2.0s"), "{}", reason);
    }

    #[test]
    fn test_ceiling_is_advisory() {
        let rec = record(0.0, &[1000.0, 5000.0, 12000.0], 301_000.0);
        let result = TimingHeuristics::new().assess(Some(&rec));
        assert!(result.is_human);
        assert!(result.has(ReasonCode::R103_TOTAL_TIME_EXCESSIVE));
    }

    #[test]
    fn test_zero_clicks_is_advisory() {
        let rec = record(0.0, &[], 4000.0);
        let result = TimingHeuristics::new().assess(Some(&rec));
        assert!(result.is_human);
        assert!(result.has(ReasonCode::R107_NO_CLICKS));
        assert!(result.stats.is_none());
    }

    #[test]
    fn test_consistency_needs_three_intervals() {
        // Two identical intervals: below the consistency minimum
        let rec = record(0.0, &[1000.0, 1300.0, 1600.0], 3000.0);
        let result = TimingHeuristics::new().assess(Some(&rec));
        assert!(result.is_human);
        assert!(!result.has(ReasonCode::R104_INTERVALS_TOO_CONSISTENT));
        assert!(!result.has(ReasonCode::R106_INTERVALS_IDENTICAL));
    }

    #[test]
    fn test_low_cv_without_identical() {
        let rec = record(0.0, &[1000.0, 1300.0, 1610.0, 1900.0], 3000.0);
        let result = TimingHeuristics::new().assess(Some(&rec));
        assert!(!result.is_human);
        assert!(result.has(ReasonCode::R104_INTERVALS_TOO_CONSISTENT));
        assert!(!result.has(ReasonCode::R106_INTERVALS_IDENTICAL));
    }

    #[test]
    fn test_identical_after_rounding() {
        let rec = record(0.0, &[1000.0, 1250.2, 1499.9, 1750.1], 3000.0);
        let result = TimingHeuristics::new().assess(Some(&rec));
        assert!(result.has(ReasonCode::R106_INTERVALS_IDENTICAL));
    }

    #[test]
    fn test_fast_interval_count_reported() {
        let rec = record(0.0, &[1000.0, 1050.0, 1600.0, 1620.0, 2400.0], 3500.0);
        let result = TimingHeuristics::new().assess(Some(&rec));
        assert!(!result.is_human);
        let finding = result
            .findings
            .iter()
            .find(|f| f.code == ReasonCode::R105_INTERVALS_TOO_FAST)
            .unwrap();
        assert!(finding.message.contains("2 interval(s)"), "{}", finding.message);
    }

    #[test]
    fn test_thinking_time_floor() {
        let rec = record(0.0, &[2600.0], 3000.0);
        let result = TimingHeuristics::new().assess(Some(&rec));
        assert!(!result.is_human);
        assert!(result.has(ReasonCode::R108_VALIDATED_TOO_FAST));
    }

    #[test]
    fn test_all_checks_run() {
        // Too short overall, identical 10ms intervals, instant submit
        let rec = record(0.0, &[100.0, 110.0, 120.0, 130.0], 200.0);
        let result = TimingHeuristics::new().assess(Some(&rec));
        assert!(!result.is_human);
        for code in [
            ReasonCode::R102_TOTAL_TIME_TOO_SHORT,
            ReasonCode::R104_INTERVALS_TOO_CONSISTENT,
            ReasonCode::R105_INTERVALS_TOO_FAST,
            ReasonCode::R106_INTERVALS_IDENTICAL,
            ReasonCode::R108_VALIDATED_TOO_FAST,
        ] {
            assert!(result.has(code), "missing {}", code);
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let config = HeuristicsConfig {
            min_total_time_secs: 0.5,
            ..HeuristicsConfig::default()
        };
        let rec = record(0.0, &[200.0, 600.0, 950.0, 1500.0], 1900.0);
        assert!(!TimingHeuristics::new().assess(Some(&rec)).is_human);
        assert!(TimingHeuristics::with_config(config).assess(Some(&rec)).is_human);
    }
}
