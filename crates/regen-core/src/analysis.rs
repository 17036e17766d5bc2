//! Satellite-analysis orchestrator: trend, score and descriptive metadata.
//!
//! Stage order per request:
//!   1. (async path only) simulated acquisition latency
//!   2. NDVI trend synthesis
//!   3. Degradation scoring
//!   4. Metadata draws: cloud cover, image age, confidence

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::context::{classify_context_with, EnvironmentalContext};
use crate::coords::Coordinate;
use crate::score::score_degradation;
use crate::trend::synthesize_trend_with;

/// Oldest simulated image, in milliseconds before "now".
const MAX_IMAGE_AGE_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Descriptive fields echoed back with every analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub data_quality: String,
    /// Percent, 0–30.
    pub cloud_cover: u8,
    pub last_image_date: DateTime<Utc>,
    pub satellite_source: String,
    pub resolution: String,
    /// Percent, 80–100.
    pub confidence: u8,
}

impl AnalysisMetadata {
    /// Draw the random metadata fields. `now` anchors the image date.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> Self {
        let cloud_cover = rng.gen_range(0..=30);
        let age_ms = rng.gen_range(0..MAX_IMAGE_AGE_MS);
        let confidence = rng.gen_range(80..=100);
        Self {
            data_quality: "high".to_string(),
            cloud_cover,
            last_image_date: now - chrono::Duration::milliseconds(age_ms),
            satellite_source: "Sentinel-2 (simulated)".to_string(),
            resolution: "10m".to_string(),
            confidence,
        }
    }
}

/// Output of one satellite analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteAnalysis {
    /// Oldest first.
    pub ndvi_trend: Vec<f64>,
    pub degradation_score: f64,
    pub metadata: AnalysisMetadata,
}

/// Per-request generator: seeded when reproducibility is wanted, otherwise
/// from OS entropy. Never shared between requests.
pub fn request_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// The analysis engine. Holds configuration only; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct SatelliteAnalyzer {
    config: EngineConfig,
}

impl SatelliteAnalyzer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run trend synthesis, scoring and metadata draws, in that order.
    pub fn analyze<R: Rng + ?Sized>(
        &self,
        coord: Coordinate,
        region: &str,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> SatelliteAnalysis {
        let ndvi_trend =
            synthesize_trend_with(&self.config.trend, &self.config.lexicon, coord, region, rng);
        let degradation_score = score_degradation(&ndvi_trend);
        let metadata = AnalysisMetadata::draw(rng, now);

        tracing::info!(region, degradation_score, "satellite analysis complete");
        SatelliteAnalysis { ndvi_trend, degradation_score, metadata }
    }

    pub fn classify(&self, coord: Coordinate, region: &str) -> EnvironmentalContext {
        classify_context_with(&self.config.lexicon, coord, region)
    }

    /// Simulated acquisition delay, or `None` when latency is disabled.
    pub fn draw_latency<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Duration> {
        let l = &self.config.latency;
        if !l.enabled {
            return None;
        }
        let ms = if l.max_ms > l.min_ms { rng.gen_range(l.min_ms..=l.max_ms) } else { l.min_ms };
        Some(Duration::from_millis(ms))
    }

    /// [`analyze`](Self::analyze) behind a non-blocking simulated delay.
    ///
    /// `rng` should be request-scoped (see [`request_rng`]) so concurrent
    /// calls never contend. Dropping the future mid-delay abandons the
    /// request with no result.
    #[cfg(feature = "runtime")]
    pub async fn analyze_with_latency<R: Rng + Send + ?Sized>(
        &self,
        coord: Coordinate,
        region: &str,
        rng: &mut R,
    ) -> SatelliteAnalysis {
        if let Some(delay) = self.draw_latency(rng) {
            tracing::debug!(region, delay_ms = delay.as_millis() as u64, "simulating acquisition");
            tokio::time::sleep(delay).await;
        }
        self.analyze(coord, region, rng, Utc::now())
    }
}
