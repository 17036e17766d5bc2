//! Recommendation text for a finished analysis.
//!
//! An external text generator plugs in through [`SummaryWriter`]. When none
//! is configured, or it fails, one of the fixed restoration templates is
//! rendered instead, so a report always carries a summary.

use async_trait::async_trait;
use rand::Rng;

use crate::coords::Coordinate;
use crate::error::Result;

/// Numeric inputs handed to the text step. Trend is oldest first, score in [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct SummaryInput<'a> {
    pub region: &'a str,
    pub coordinates: Coordinate,
    pub ndvi_trend: &'a [f64],
    pub degradation_score: f64,
}

/// External recommendation generator, typically a remote text model.
///
/// Implementations must be `Send + Sync`; the service awaits them inside
/// concurrently running requests.
#[async_trait]
pub trait SummaryWriter: Send + Sync {
    async fn write_summary(&self, input: &SummaryInput<'_>) -> Result<String>;
}

fn fmt_ndvi(v: Option<&f64>) -> String {
    v.map(|v| format!("{v:.2}")).unwrap_or_else(|| "n/a".to_string())
}

/// Built-in template renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSummary;

impl TemplateSummary {
    pub const TEMPLATE_COUNT: usize = 2;

    /// Render template `index` (taken modulo [`Self::TEMPLATE_COUNT`]).
    pub fn render(&self, index: usize, input: &SummaryInput<'_>) -> String {
        let pct = format!("{:.1}", input.degradation_score * 100.0);
        let region = input.region;
        match index % Self::TEMPLATE_COUNT {
            0 => format!(
                "Vegetation analysis for {region} shows {pct}% degradation risk. \
The NDVI trend from {first} to {last} indicates declining plant health.

RECOMMENDED ACTIONS:
1. **Soil Conservation**: Implement contour farming and terracing to prevent erosion
2. **Vegetation Restoration**: Plant native drought-resistant species suited to local conditions
3. **Water Management**: Install rainwater harvesting systems and improve irrigation efficiency
4. **Sustainable Practices**: Adopt rotational grazing and reduce overuse of degraded areas

These interventions can help restore vegetation cover and improve long-term land productivity.",
                first = fmt_ndvi(input.ndvi_trend.first()),
                last = fmt_ndvi(input.ndvi_trend.last()),
            ),
            _ => format!(
                "The {region} area exhibits {pct}% degradation with declining NDVI values. \
This pattern suggests environmental stress requiring immediate intervention.

RESTORATION STRATEGY:
1. **Erosion Control**: Establish windbreaks and plant ground cover to stabilize soil
2. **Nutrient Management**: Apply organic matter and practice sustainable fertilization
3. **Water Conservation**: Create retention ponds and implement drip irrigation
4. **Community Engagement**: Train local farmers in regenerative agriculture techniques

Early action can reverse degradation trends and restore ecosystem health within 2-3 years."
            ),
        }
    }

    pub fn pick<R: Rng + ?Sized>(&self, input: &SummaryInput<'_>, rng: &mut R) -> String {
        self.render(rng.gen_range(0..Self::TEMPLATE_COUNT), input)
    }
}

/// Ask `writer` for a summary, falling back to a template on absence or error.
pub async fn summarize_or_fallback<R: Rng + Send + ?Sized>(
    writer: Option<&dyn SummaryWriter>,
    input: &SummaryInput<'_>,
    rng: &mut R,
) -> String {
    if let Some(w) = writer {
        match w.write_summary(input).await {
            Ok(text) => return text,
            Err(e) => {
                tracing::warn!(region = input.region, error = %e, "summary writer failed, using template");
            }
        }
    }
    TemplateSummary.pick(input, rng)
}
