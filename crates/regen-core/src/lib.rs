//! ReGenLens analysis engine.
//!
//! Turns a coordinate plus a free-text region label into a mocked
//! land-degradation report:
//! - `trend`: synthetic 4-year NDVI series (lexicon keyword, else climate band)
//! - `score`: fractional decline → degradation score in [0, 1]
//! - `context`: climate zone, rainfall and threat list
//! - `analysis`: orchestration plus satellite metadata, optional simulated latency
//! - `summary` / `report` / `store` / `service`: the request pipeline around it
//!
//! Every random draw goes through a caller-supplied `rand::Rng`, so a seeded
//! generator reproduces a report exactly.

pub mod analysis;
pub mod config;
pub mod context;
pub mod coords;
pub mod error;
pub mod lexicon;
pub mod regions;
pub mod report;
pub mod score;
pub mod service;
pub mod store;
pub mod summary;
pub mod trend;

pub use analysis::{request_rng, AnalysisMetadata, SatelliteAnalysis, SatelliteAnalyzer};
pub use config::{EngineConfig, LatencyParams, TrendParams};
pub use context::{classify_context, ClimateZone, EnvironmentalContext, SiteProfile};
pub use coords::Coordinate;
pub use error::{Error, Result};
pub use lexicon::{KeywordRule, Lexicon};
pub use report::{AnalysisReport, AnalysisRequest};
pub use score::{score_degradation, SeverityLevel, FALLBACK_SCORE};
pub use service::RegenService;
pub use store::{AnalysisStore, MemoryStore};
pub use summary::{SummaryWriter, TemplateSummary};
pub use trend::{describe_trend, synthesize_trend, TrendDirection};
