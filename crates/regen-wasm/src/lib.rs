//! Browser bindings for the analysis engine.
//!
//! Each export takes and returns JSON-shaped values so the frontend can
//! call it in place of the hosted analysis endpoint. Exports that touch
//! the service return promises. The simulated delay is left to the caller.

use anyhow::{Context, Result};
use chrono::Utc;
use once_cell::sync::Lazy;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use regen_core::regions::{sample_regions as demo_regions, SampleRegion};
use regen_core::score::degradation_ratio;
use regen_core::store::StoredAnalysis;
use regen_core::trend::{label_years, YearlyObservation};
use regen_core::{
    describe_trend, request_rng, score_degradation, AnalysisReport, AnalysisRequest, EngineConfig,
    MemoryStore, RegenService, SeverityLevel, TrendDirection,
};

/// One service per page session, so `history` sees earlier analyses.
static SERVICE: Lazy<RegenService> =
    Lazy::new(|| RegenService::default().with_store(MemoryStore::new()));

/// Score breakdown for a caller-supplied trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendScore {
    pub degradation_score: f64,
    /// `None` when the trend is too short or starts at zero.
    pub decline_ratio: Option<f64>,
    pub severity: &'static str,
    pub direction: TrendDirection,
    pub description: &'static str,
    pub years: Vec<YearlyObservation>,
}

// ── Plain-Rust core (testable off the browser) ───────────────────────────────

async fn analyze_json(request_json: &str, seed: Option<u64>) -> Result<AnalysisReport> {
    let request = AnalysisRequest::from_json(request_json).context("invalid analysis request")?;
    let mut rng = request_rng(seed);
    Ok(SERVICE.run(&request, &mut rng, Utc::now()).await?)
}

fn score_json(trend_json: &str) -> Result<TrendScore> {
    let trend: Vec<f64> =
        serde_json::from_str(trend_json).context("trend must be a JSON array of numbers")?;
    let degradation_score = score_degradation(&trend);
    let direction = describe_trend(&trend);
    Ok(TrendScore {
        degradation_score,
        decline_ratio: degradation_ratio(&trend).ok(),
        severity: SeverityLevel::from_score(degradation_score).label(),
        direction,
        description: direction.description(),
        years: label_years(&trend, EngineConfig::default().trend.start_year),
    })
}

async fn history_for(region: &str) -> Result<Vec<StoredAnalysis>> {
    Ok(SERVICE.history(region).await?)
}

// ── Exports ──────────────────────────────────────────────────────────────────

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_err(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{e:#}"))
}

/// Analyze `{"region": ..., "coordinates": {"lat": ..., "lng": ...}}`.
/// A `seed` makes the report reproducible.
#[wasm_bindgen]
pub async fn analyze(request_json: String, seed: Option<u64>) -> Result<JsValue, JsValue> {
    let report = analyze_json(&request_json, seed).await.map_err(js_err)?;
    to_js(&report)
}

/// Degradation score, severity and per-year health for a JSON array of NDVI values.
#[wasm_bindgen]
pub fn score(trend_json: &str) -> Result<JsValue, JsValue> {
    let s = score_json(trend_json).map_err(js_err)?;
    to_js(&s)
}

/// Reports analyzed in this page session for `region`, newest first.
#[wasm_bindgen]
pub async fn history(region: String) -> Result<JsValue, JsValue> {
    let rows = history_for(&region).await.map_err(js_err)?;
    to_js(&rows)
}

#[wasm_bindgen]
pub fn sample_regions() -> Result<JsValue, JsValue> {
    let regions: Vec<SampleRegion> = demo_regions();
    to_js(&regions)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use regen_core::Error;

    #[tokio::test]
    async fn analyze_json_round_trip() {
        let req = r#"{"region": "Sahel Region, Niger", "coordinates": {"lat": 13.5116, "lng": 2.1254}}"#;
        let a = analyze_json(req, Some(3)).await.unwrap();
        let b = analyze_json(req, Some(3)).await.unwrap();
        assert_eq!(a.ndvi_trend, b.ndvi_trend);
        assert_eq!(a.ndvi_trend.len(), 4);
        assert!(a.id.is_some());
        assert_ne!(a.id, b.id, "each stored report gets a fresh id");

        let rows = history_for("Sahel Region, Niger").await.unwrap();
        assert!(rows.len() >= 2);
        assert_eq!(rows[0].id, b.id.unwrap());
    }

    #[tokio::test]
    async fn bad_request_reports_cause() {
        let err = analyze_json(r#"{"coordinates": {"lat": 1, "lng": 2}}"#, None).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::MissingRegion)));

        let err = analyze_json("not json", None).await.unwrap_err();
        assert!(format!("{err:#}").starts_with("invalid analysis request"));
    }

    #[test]
    fn score_json_breakdown() {
        let s = score_json("[0.8, 0.7, 0.5, 0.4]").unwrap();
        assert_eq!(s.degradation_score, 0.5);
        assert_eq!(s.severity, "Severe Risk");
        assert_eq!(s.direction, TrendDirection::SevereDecline);
        assert_eq!(s.years.len(), 4);
        assert_eq!(s.years[0].health, regen_core::trend::VegetationHealth::Healthy);
        assert_eq!(s.years[0].year, 2022);

        let degenerate = score_json("[0.0, 0.4]").unwrap();
        assert_eq!(degenerate.degradation_score, regen_core::FALLBACK_SCORE);
        assert!(degenerate.decline_ratio.is_none());

        assert!(score_json("{}").is_err());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    async fn exports_return_objects() {
        assert!(sample_regions().unwrap().is_object());
        assert!(score("[0.5, 0.4]").unwrap().is_object());
        assert!(analyze("{}".to_string(), None).await.is_err());
    }
}
