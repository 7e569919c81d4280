//! Tunable configuration
//!
//! Every field defaults to the constants in the crate root, so an empty JSON
//! object is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Result, SnapgridError, DEFAULT_COLS, DEFAULT_ROWS, MAX_ATTEMPTS, MAX_SESSIONS, MAX_TOTAL_TIME_SECS,
    MIN_CLICK_INTERVAL_MS, MIN_INTERVALS_FOR_CONSISTENCY, MIN_INTERVAL_CV, MIN_THINKING_TIME_MS,
    MIN_TOTAL_TIME_SECS, SESSION_TTL_SECS,
};

/// Timing heuristic thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    pub min_total_time_secs: f64,
    pub max_total_time_secs: f64,
    pub min_interval_cv: f64,
    pub min_intervals_for_consistency: usize,
    pub min_click_interval_ms: f64,
    pub min_thinking_time_ms: f64,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            min_total_time_secs: MIN_TOTAL_TIME_SECS,
            max_total_time_secs: MAX_TOTAL_TIME_SECS,
            min_interval_cv: MIN_INTERVAL_CV,
            min_intervals_for_consistency: MIN_INTERVALS_FOR_CONSISTENCY,
            min_click_interval_ms: MIN_CLICK_INTERVAL_MS,
            min_thinking_time_ms: MIN_THINKING_TIME_MS,
        }
    }
}

/// HTTP host session retention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub session_ttl_secs: f64,
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: SESSION_TTL_SECS,
            max_sessions: MAX_SESSIONS,
        }
    }
}

/// Session-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapgridConfig {
    pub rows: usize,
    pub cols: usize,
    pub max_attempts: u32,
    pub heuristics: HeuristicsConfig,
    pub server: ServerConfig,
}

impl Default for SnapgridConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            max_attempts: MAX_ATTEMPTS,
            heuristics: HeuristicsConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SnapgridConfig {
    /// Load from a JSON file and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.rows.checked_mul(self.cols) {
            Some(cells) if cells >= 2 => {}
            _ => {
                return Err(SnapgridError::GridTooSmall {
                    rows: self.rows,
                    cols: self.cols,
                })
            }
        }
        if self.max_attempts == 0 {
            return Err(SnapgridError::Config("max_attempts must be at least 1".to_string()));
        }
        let h = &self.heuristics;
        if h.min_total_time_secs < 0.0 || h.min_click_interval_ms < 0.0 || h.min_thinking_time_ms < 0.0 {
            return Err(SnapgridError::Config("timing thresholds must not be negative".to_string()));
        }
        if h.max_total_time_secs < h.min_total_time_secs {
            return Err(SnapgridError::Config(
                "max_total_time_secs must not be below min_total_time_secs".to_string(),
            ));
        }
        let server = &self.server;
        if server.session_ttl_secs.is_nan() || server.session_ttl_secs <= 0.0 {
            return Err(SnapgridError::Config("session_ttl_secs must be positive".to_string()));
        }
        if server.max_sessions == 0 {
            return Err(SnapgridError::Config("max_sessions must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_json_is_default() {
        let config = SnapgridConfig::from_json("{}").unwrap();
        assert_eq!(config, SnapgridConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = SnapgridConfig::from_json(
            r#"{"rows": 3, "heuristics": {"min_click_interval_ms": 50.0}}"#,
        )
        .unwrap();
        assert_eq!(config.rows, 3);
        assert_eq!(config.cols, DEFAULT_COLS);
        assert_eq!(config.heuristics.min_click_interval_ms, 50.0);
        assert_eq!(config.heuristics.min_thinking_time_ms, MIN_THINKING_TIME_MS);
    }

    #[test]
    fn test_rejects_tiny_grid() {
        let err = SnapgridConfig::from_json(r#"{"rows": 1, "cols": 1}"#).unwrap_err();
        assert!(matches!(err, SnapgridError::GridTooSmall { rows: 1, cols: 1 }));
    }

    #[test]
    fn test_rejects_zero_attempts() {
        let err = SnapgridConfig::from_json(r#"{"max_attempts": 0}"#).unwrap_err();
        assert!(matches!(err, SnapgridError::Config(_)));
    }

    #[test]
    fn test_server_retention() {
        let config = SnapgridConfig::from_json(r#"{"server": {"max_sessions": 50}}"#).unwrap();
        assert_eq!(config.server.max_sessions, 50);
        assert_eq!(config.server.session_ttl_secs, SESSION_TTL_SECS);

        let err = SnapgridConfig::from_json(r#"{"server": {"session_ttl_secs": 0.0}}"#).unwrap_err();
        assert!(matches!(err, SnapgridError::Config(_)));
        let err = SnapgridConfig::from_json(r#"{"server": {"max_sessions": 0}}"#).unwrap_err();
        assert!(matches!(err, SnapgridError::Config(_)));
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = SnapgridConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, SnapgridError::Json(_)));
    }
}
