//! Offline harness for the analysis engine.
//!
//! Single mode analyzes one region and prints the full report. Batch mode
//! sweeps the demo catalogue concurrently and checks every report against
//! the engine's output invariants.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tokio::task::JoinSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use regen_core::context::site_profile;
use regen_core::regions::{find_region, sample_regions};
use regen_core::trend::label_years;
use regen_core::{
    describe_trend, request_rng, score_degradation, AnalysisReport, AnalysisRequest, EngineConfig,
    LatencyParams, MemoryStore, RegenService, SeverityLevel, TrendDirection,
};

#[derive(Parser, Debug)]
#[command(name = "regen-test", about = "Analysis engine runner and invariant sweep")]
struct Args {
    /// Engine configuration JSON. Missing keys take their defaults.
    #[arg(short, long)]
    config: Option<String>,

    /// Base seed. Batch run `i` uses `seed + i`.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Region label to analyze.
    #[arg(short, long)]
    region: Option<String>,

    /// Latitude; looked up from the demo catalogue when omitted.
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude; looked up from the demo catalogue when omitted.
    #[arg(long, allow_hyphen_values = true)]
    lng: Option<f64>,

    /// Sweep every demo region.
    #[arg(long)]
    batch: bool,

    /// Reports per region in batch mode.
    #[arg(long, default_value_t = 20)]
    runs: u64,

    /// Skip the simulated acquisition delay.
    #[arg(long)]
    no_latency: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SingleOutput {
    report: AnalysisReport,
    severity: &'static str,
    direction: TrendDirection,
    years: Vec<regen_core::trend::YearlyObservation>,
    site: regen_core::SiteProfile,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct RegionStats {
    runs: u64,
    min_score: f64,
    max_score: f64,
    mean_score: f64,
    directions: BTreeMap<String, u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchSummary {
    reports: u64,
    elapsed_ms: u128,
    violations: Vec<String>,
    regions: BTreeMap<String, RegionStats>,
}

/// Mixed into the run seed for the site profile, so its draws do not
/// replay the trend's decline-rate draw.
const SITE_SEED_SALT: u64 = 0x5EED;

fn site_seed(seed: Option<u64>) -> Option<u64> {
    seed.map(|s| s ^ SITE_SEED_SALT)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regen_core=info,regen_test=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path).with_context(|| format!("loading {path}"))?,
        None => EngineConfig::default(),
    };
    if args.no_latency {
        config.latency = LatencyParams::disabled();
    }
    config.validate()?;
    Ok(config)
}

/// Every output invariant a report must satisfy, as human-readable failures.
fn check_report(report: &AnalysisReport, config: &EngineConfig) -> Vec<String> {
    let mut out = Vec::new();
    let t = &config.trend;
    let tag = &report.region;

    if report.ndvi_trend.len() != t.years {
        out.push(format!("{tag}: trend has {} values, want {}", report.ndvi_trend.len(), t.years));
    }
    for &v in &report.ndvi_trend {
        if !(t.floor..=t.ceiling).contains(&v) {
            out.push(format!("{tag}: ndvi {v} outside [{}, {}]", t.floor, t.ceiling));
        }
        if ((v * 1000.0).round() - v * 1000.0).abs() > 1e-6 {
            out.push(format!("{tag}: ndvi {v} not rounded to 3 decimals"));
        }
    }
    if !(0.0..=1.0).contains(&report.degradation_score) {
        out.push(format!("{tag}: score {} outside [0, 1]", report.degradation_score));
    }
    let rescored = score_degradation(&report.ndvi_trend);
    if rescored != report.degradation_score {
        out.push(format!("{tag}: score {} does not match trend ({rescored})", report.degradation_score));
    }
    let m = &report.metadata;
    if m.cloud_cover > 30 {
        out.push(format!("{tag}: cloud cover {} > 30", m.cloud_cover));
    }
    if !(80..=100).contains(&m.confidence) {
        out.push(format!("{tag}: confidence {} outside [80, 100]", m.confidence));
    }
    if m.last_image_date > report.analysis_date {
        out.push(format!("{tag}: image dated after the analysis"));
    }
    if report.ai_summary.trim().is_empty() {
        out.push(format!("{tag}: empty summary"));
    }
    out
}

async fn run_single(args: &Args, config: EngineConfig) -> Result<()> {
    let Some(region) = args.region.clone() else {
        bail!("no region specified. Use --region, --batch or --help");
    };
    let (lat, lng) = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => match find_region(&region) {
            Some(r) => (r.coordinates.lat, r.coordinates.lng),
            None => bail!("'{region}' is not a demo region; pass --lat and --lng"),
        },
    };

    let start_year = config.trend.start_year;
    let svc = RegenService::new(config);
    let report = svc.analyze(&AnalysisRequest::new(region, lat, lng), args.seed).await?;

    let out = SingleOutput {
        severity: SeverityLevel::from_score(report.degradation_score).label(),
        direction: describe_trend(&report.ndvi_trend),
        years: label_years(&report.ndvi_trend, start_year),
        site: site_profile(&mut request_rng(site_seed(args.seed))),
        report,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

async fn run_batch(args: &Args, config: EngineConfig) -> Result<()> {
    let base = args.seed.unwrap_or(0);
    let svc = Arc::new(RegenService::new(config.clone()).with_store(MemoryStore::new()));
    let start = Instant::now();

    let mut tasks = JoinSet::new();
    for region in sample_regions() {
        for i in 0..args.runs {
            let svc = Arc::clone(&svc);
            let request =
                AnalysisRequest::new(region.name.clone(), region.coordinates.lat, region.coordinates.lng);
            tasks.spawn(async move { svc.analyze(&request, Some(base.wrapping_add(i))).await });
        }
    }

    let mut violations = Vec::new();
    let mut regions: BTreeMap<String, RegionStats> = BTreeMap::new();
    let mut reports = 0;
    while let Some(joined) = tasks.join_next().await {
        let report = joined.context("analysis task panicked")??;
        violations.extend(check_report(&report, &config));

        let s = regions.entry(report.region.clone()).or_insert_with(|| RegionStats {
            min_score: f64::INFINITY,
            max_score: f64::NEG_INFINITY,
            ..RegionStats::default()
        });
        s.runs += 1;
        s.min_score = s.min_score.min(report.degradation_score);
        s.max_score = s.max_score.max(report.degradation_score);
        s.mean_score += report.degradation_score;
        let dir = serde_json::to_value(describe_trend(&report.ndvi_trend))?;
        *s.directions.entry(dir.as_str().unwrap_or("unknown").to_string()).or_default() += 1;
        reports += 1;
    }
    for s in regions.values_mut() {
        s.mean_score /= s.runs as f64;
    }

    for region in sample_regions() {
        let stored = svc.history(&region.name).await?.len() as u64;
        let want = args.runs.min(regen_core::store::DEFAULT_HISTORY_LIMIT as u64);
        if stored != want {
            violations.push(format!("{}: history returned {stored} rows, want {want}", region.name));
        }
    }

    let summary = BatchSummary {
        reports,
        elapsed_ms: start.elapsed().as_millis(),
        violations,
        regions,
    };
    tracing::info!(reports, elapsed_ms = summary.elapsed_ms as u64, "batch complete");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if !summary.violations.is_empty() {
        bail!("{} invariant violations", summary.violations.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(&args)?;
    tracing::info!(
        latency = config.latency.enabled,
        years = config.trend.years,
        generated_at = %chrono::Utc::now(),
        "engine configured"
    );

    if args.batch {
        run_batch(&args, config).await
    } else {
        run_single(&args, config).await
    }
}
