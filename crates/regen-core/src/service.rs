//! Request pipeline: validate → analyze → classify → summarize → store.
//!
//! Only validation can fail a request. Summary and storage problems are
//! logged and the report is returned regardless.
//!
//! The summary writer and the store are awaited, so slow collaborators
//! suspend the request instead of blocking the executor thread.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::analysis::{SatelliteAnalysis, SatelliteAnalyzer};
use crate::config::EngineConfig;
use crate::coords::Coordinate;
use crate::error::Result;
use crate::report::{AnalysisReport, AnalysisRequest};
use crate::store::{AnalysisStore, StoredAnalysis, DEFAULT_HISTORY_LIMIT};
use crate::summary::{summarize_or_fallback, SummaryInput, SummaryWriter};

pub struct RegenService {
    analyzer: SatelliteAnalyzer,
    writer: Option<Box<dyn SummaryWriter>>,
    store: Option<Box<dyn AnalysisStore>>,
}

impl RegenService {
    pub fn new(config: EngineConfig) -> Self {
        Self { analyzer: SatelliteAnalyzer::new(config), writer: None, store: None }
    }

    pub fn with_writer(mut self, writer: impl SummaryWriter + 'static) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    pub fn with_store(mut self, store: impl AnalysisStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn analyzer(&self) -> &SatelliteAnalyzer {
        &self.analyzer
    }

    /// Run a request without the simulated delay. Needs no timer, so it
    /// also serves executors without tokio (the browser build).
    pub async fn run<R: Rng + Send + ?Sized>(
        &self,
        request: &AnalysisRequest,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<AnalysisReport> {
        let (region, coord) = request.validate()?;
        tracing::info!(%region, lat = coord.lat, lng = coord.lng, "starting analysis");
        let analysis = self.analyzer.analyze(coord, &region, rng, now);
        Ok(self.finish(region, coord, analysis, rng, now).await)
    }

    /// Run a request behind the configured non-blocking delay, with a
    /// request-scoped generator (seeded for reproducible output).
    #[cfg(feature = "runtime")]
    pub async fn analyze(&self, request: &AnalysisRequest, seed: Option<u64>) -> Result<AnalysisReport> {
        let (region, coord) = request.validate()?;
        tracing::info!(%region, lat = coord.lat, lng = coord.lng, "starting analysis");
        let mut rng = crate::analysis::request_rng(seed);
        let analysis = self.analyzer.analyze_with_latency(coord, &region, &mut rng).await;
        Ok(self.finish(region, coord, analysis, &mut rng, Utc::now()).await)
    }

    /// Stored reports for `region`, newest first. Empty without a store.
    pub async fn history(&self, region: &str) -> Result<Vec<StoredAnalysis>> {
        match &self.store {
            Some(store) => store.history(region, DEFAULT_HISTORY_LIMIT).await,
            None => Ok(Vec::new()),
        }
    }

    async fn finish<R: Rng + Send + ?Sized>(
        &self,
        region: String,
        coord: Coordinate,
        analysis: SatelliteAnalysis,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> AnalysisReport {
        let context = self.analyzer.classify(coord, &region);
        let summary = summarize_or_fallback(
            self.writer.as_deref(),
            &SummaryInput {
                region: &region,
                coordinates: coord,
                ndvi_trend: &analysis.ndvi_trend,
                degradation_score: analysis.degradation_score,
            },
            rng,
        )
        .await;

        let mut report = AnalysisReport::assemble(region, coord, analysis, context, summary, now);
        if let Some(store) = &self.store {
            match store.store(&report).await {
                Ok(id) => {
                    tracing::info!(%id, region = %report.region, "analysis stored");
                    report.id = Some(id);
                }
                Err(e) => {
                    tracing::warn!(region = %report.region, error = %e, "failed to store analysis, returning result anyway");
                }
            }
        }
        report
    }
}

impl Default for RegenService {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
