/// Degradation scoring from an NDVI trend.
///
/// score = clamp((first - last) / first, 0, 1), rounded to 3 dp.
/// 0 = no decline (rising trends clamp here), 1 = decline to zero.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::trend::round3;

/// Score reported when the trend carries too little information
/// ("moderate risk").
pub const FALLBACK_SCORE: f64 = 0.3;

/// Fractional decline from first to last observation, unclamped.
///
/// Fails with [`Error::DegenerateTrend`] for fewer than two values or a
/// zero / non-finite first value, or a non-finite last value.
pub fn degradation_ratio(trend: &[f64]) -> Result<f64> {
    let degenerate = || Error::DegenerateTrend { len: trend.len(), first: trend.first().copied() };
    if trend.len() < 2 {
        return Err(degenerate());
    }
    let first = trend[0];
    let last = trend[trend.len() - 1];
    if first == 0.0 || !first.is_finite() || !last.is_finite() {
        return Err(degenerate());
    }
    Ok((first - last) / first)
}

/// Degradation score in [0, 1]. Degenerate trends score [`FALLBACK_SCORE`].
pub fn score_degradation(trend: &[f64]) -> f64 {
    match degradation_ratio(trend) {
        Ok(ratio) => {
            let score = round3(ratio.clamp(0.0, 1.0));
            tracing::debug!(score, "degradation score");
            score
        }
        Err(e) => {
            tracing::debug!(error = %e, "falling back to default degradation score");
            FALLBACK_SCORE
        }
    }
}

/// Risk band of a degradation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityLevel {
    Low,      // < 0.10
    Moderate, // 0.10-0.25
    High,     // 0.25-0.50
    Severe,   // >= 0.50
}

impl SeverityLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 0.1 {
            SeverityLevel::Low
        } else if score < 0.25 {
            SeverityLevel::Moderate
        } else if score < 0.5 {
            SeverityLevel::High
        } else {
            SeverityLevel::Severe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeverityLevel::Low => "Low Risk",
            SeverityLevel::Moderate => "Moderate Risk",
            SeverityLevel::High => "High Risk",
            SeverityLevel::Severe => "Severe Risk",
        }
    }
}
