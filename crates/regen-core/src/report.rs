//! Request parsing and the JSON report returned to the frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::SatelliteAnalysis;
use crate::context::{ClimateZone, EnvironmentalContext};
use crate::coords::Coordinate;
use crate::error::{Error, Result};

/// Incoming analysis request. Fields are optional here so that missing
/// ones map to specific input errors instead of a generic parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinate>,
}

impl AnalysisRequest {
    pub fn new(region: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            region: Some(region.into()),
            coordinates: Some(Coordinate { lat, lng }),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Region and range-checked coordinate, or the first input error.
    pub fn validate(&self) -> Result<(String, Coordinate)> {
        let region = match self.region.as_deref() {
            Some(r) if !r.trim().is_empty() => r.to_string(),
            _ => return Err(Error::MissingRegion),
        };
        let coord = self.coordinates.ok_or(Error::MissingCoordinates)?.validated()?;
        Ok((region, coord))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub data_quality: String,
    pub cloud_cover: u8,
    pub last_image_date: DateTime<Utc>,
    pub satellite_source: String,
    pub confidence: u8,
    pub climate_zone: ClimateZone,
    pub avg_rainfall: u32,
    pub primary_threats: Vec<String>,
}

/// Everything the frontend renders for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Set once the report has been stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub region: String,
    pub coordinates: Coordinate,
    pub ndvi_trend: Vec<f64>,
    pub degradation_score: f64,
    pub ai_summary: String,
    pub metadata: ReportMetadata,
    pub analysis_date: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn assemble(
        region: String,
        coordinates: Coordinate,
        analysis: SatelliteAnalysis,
        context: EnvironmentalContext,
        ai_summary: String,
        analysis_date: DateTime<Utc>,
    ) -> Self {
        let m = analysis.metadata;
        Self {
            id: None,
            region,
            coordinates,
            ndvi_trend: analysis.ndvi_trend,
            degradation_score: analysis.degradation_score,
            ai_summary,
            metadata: ReportMetadata {
                data_quality: m.data_quality,
                cloud_cover: m.cloud_cover,
                last_image_date: m.last_image_date,
                satellite_source: m.satellite_source,
                confidence: m.confidence,
                climate_zone: context.climate_zone,
                avg_rainfall: context.avg_rainfall,
                primary_threats: context.primary_threats,
            },
            analysis_date,
        }
    }
}
