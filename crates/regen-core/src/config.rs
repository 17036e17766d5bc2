//! Engine configuration.
//!
//! Every field has a default matching the historical behaviour, so an empty
//! JSON object `{}` is a complete config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lexicon::Lexicon;

/// Length of every reported NDVI trend.
pub const TREND_YEARS: usize = 4;

/// Parameters of the synthetic NDVI trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendParams {
    /// Number of yearly observations. Reports always carry
    /// [`TREND_YEARS`]; other values are rejected by `validate`.
    pub years: usize,
    /// Calendar year of the first observation, default 2022. Labels only.
    pub start_year: i32,
    /// Half-width of the per-year jitter, default 0.025.
    pub jitter: f64,
    /// Per-run decline rate range, default 0.02–0.08.
    pub decline_min: f64,
    pub decline_max: f64,
    /// Upper bound of the per-year decline multiplier (lower bound 1.0), default 1.5.
    pub multiplier_max: f64,
    /// Clamp range for every yearly value, default 0.1–1.0.
    pub floor: f64,
    pub ceiling: f64,
}

impl Default for TrendParams {
    fn default() -> Self {
        Self {
            years: TREND_YEARS,
            start_year: 2022,
            jitter: 0.025,
            decline_min: 0.02,
            decline_max: 0.08,
            multiplier_max: 1.5,
            floor: 0.1,
            ceiling: 1.0,
        }
    }
}

/// Simulated remote-sensing latency. Only honoured by the async path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyParams {
    pub enabled: bool,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for LatencyParams {
    fn default() -> Self {
        Self { enabled: true, min_ms: 1000, max_ms: 3000 }
    }
}

impl LatencyParams {
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub trend: TrendParams,
    pub latency: LatencyParams,
    pub lexicon: Lexicon,
}

fn invalid(field: &'static str, reason: impl Into<String>) -> Error {
    Error::InvalidConfig { field, reason: reason.into() }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: EngineConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.trend;
        if t.years != TREND_YEARS {
            return Err(invalid("trend.years", format!("{} != {TREND_YEARS}", t.years)));
        }
        if !(t.jitter.is_finite() && t.jitter >= 0.0) {
            return Err(invalid("trend.jitter", format!("{} must be finite and >= 0", t.jitter)));
        }
        if !(t.decline_min >= 0.0 && t.decline_min <= t.decline_max && t.decline_max.is_finite()) {
            return Err(invalid(
                "trend.decline_min",
                format!("need 0 <= {} <= {}", t.decline_min, t.decline_max),
            ));
        }
        if !(t.multiplier_max >= 1.0 && t.multiplier_max.is_finite()) {
            return Err(invalid("trend.multiplier_max", format!("{} < 1.0", t.multiplier_max)));
        }
        if !(t.floor > 0.0 && t.floor < t.ceiling && t.ceiling <= 1.0) {
            return Err(invalid(
                "trend.floor",
                format!("need 0 < {} < {} <= 1", t.floor, t.ceiling),
            ));
        }
        if self.latency.min_ms > self.latency.max_ms {
            return Err(invalid(
                "latency.min_ms",
                format!("{} > max_ms {}", self.latency.min_ms, self.latency.max_ms),
            ));
        }
        if let Some(field) = self.lexicon.find_empty_rule() {
            return Err(invalid(field, "rule with no usable keyword"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let cfg = EngineConfig::from_json("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.trend.years, 4);
        assert!(cfg.latency.enabled);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = EngineConfig::from_json(r#"{"latency": {"enabled": false}, "trend": {"jitter": 0.0}}"#)
            .unwrap();
        assert!(!cfg.latency.enabled);
        assert_eq!(cfg.latency.max_ms, 3000);
        assert_eq!(cfg.trend.jitter, 0.0);
        assert_eq!(cfg.trend.decline_max, 0.08);
    }

    #[test]
    fn lexicon_can_be_replaced_from_json() {
        let cfg = EngineConfig::from_json(
            r#"{"lexicon": {"vegetation": [{"keywords": ["tundra"], "value": 0.2}], "context": []}}"#,
        )
        .unwrap();
        assert_eq!(cfg.lexicon.base_index_for("Siberian Tundra"), Some(0.2));
        assert_eq!(cfg.lexicon.base_index_for("Sahel"), None);
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            (r#"{"trend": {"years": 1}}"#, "trend.years"),
            (r#"{"trend": {"years": 7}}"#, "trend.years"),
            (r#"{"trend": {"years": 18446744073709551615}}"#, "trend.years"),
            (r#"{"trend": {"decline_min": 0.1, "decline_max": 0.05}}"#, "trend.decline_min"),
            (r#"{"trend": {"multiplier_max": 0.5}}"#, "trend.multiplier_max"),
            (r#"{"trend": {"floor": 0.0}}"#, "trend.floor"),
            (r#"{"latency": {"min_ms": 10, "max_ms": 5}}"#, "latency.min_ms"),
            (r#"{"lexicon": {"vegetation": [{"keywords": [""], "value": 0.2}], "context": []}}"#, "lexicon.vegetation"),
        ];
        for (json, expected) in cases {
            match EngineConfig::from_json(json) {
                Err(Error::InvalidConfig { field, .. }) => assert_eq!(field, expected, "{json}"),
                other => panic!("{json}: expected InvalidConfig, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_json_is_json_error() {
        assert!(matches!(EngineConfig::from_json("{"), Err(Error::Json(_))));
    }
}
