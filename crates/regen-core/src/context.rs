//! Environmental context classification.
//!
//! Latitude gives a coarse default:
//!   - Tropical         |lat| < 23.5   1200 mm/yr
//!   - Temperate        |lat| > 40      600 mm/yr
//!   - Temperate (mid)  otherwise       800 mm/yr
//!
//! A region-label keyword match in the lexicon then replaces the default
//! wholesale (zone, rainfall and threat list).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::coords::Coordinate;
use crate::lexicon::Lexicon;

/// Tropic of Cancer / Capricorn, degrees.
pub const TROPIC_LAT: f64 = 23.5;
/// Poleward edge of the subtropical band used by the default.
pub const TEMPERATE_LAT: f64 = 40.0;

const DEFAULT_THREATS: [&str; 2] = ["soil erosion", "climate variability"];

/// Coarse climate classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClimateZone {
    Tropical,
    Temperate,
    Arid,
    SemiArid,
}

impl ClimateZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClimateZone::Tropical => "tropical",
            ClimateZone::Temperate => "temperate",
            ClimateZone::Arid => "arid",
            ClimateZone::SemiArid => "semi-arid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalContext {
    pub climate_zone: ClimateZone,
    /// Mean annual rainfall in mm.
    pub avg_rainfall: u32,
    /// Ordered most-to-least pressing.
    pub primary_threats: Vec<String>,
}

impl EnvironmentalContext {
    pub fn new(climate_zone: ClimateZone, avg_rainfall: u32, threats: &[&str]) -> Self {
        Self {
            climate_zone,
            avg_rainfall,
            primary_threats: threats.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Report filler with no model behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteProfile {
    pub soil_type: String,
    /// Metres, 0–2000.
    pub elevation: u32,
    pub land_use: String,
}

/// Classify a location with the built-in lexicon.
pub fn classify_context(coord: Coordinate, region: &str) -> EnvironmentalContext {
    classify_context_with(Lexicon::builtin(), coord, region)
}

/// Classify a location: latitude default, then the first matching keyword
/// override from `lexicon`.
pub fn classify_context_with(
    lexicon: &Lexicon,
    coord: Coordinate,
    region: &str,
) -> EnvironmentalContext {
    if let Some(ctx) = lexicon.context_for(region) {
        return ctx.clone();
    }

    let lat_abs = coord.abs_lat();
    let (zone, rainfall) = if lat_abs < TROPIC_LAT {
        (ClimateZone::Tropical, 1200)
    } else if lat_abs > TEMPERATE_LAT {
        (ClimateZone::Temperate, 600)
    } else {
        (ClimateZone::Temperate, 800)
    };

    EnvironmentalContext::new(zone, rainfall, &DEFAULT_THREATS)
}

/// Draw the filler site fields.
pub fn site_profile<R: Rng + ?Sized>(rng: &mut R) -> SiteProfile {
    SiteProfile {
        soil_type: "mixed".to_string(),
        elevation: rng.gen_range(0..=2000),
        land_use: "agriculture/pastoral".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn at(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn machakos_is_semi_arid() {
        let ctx = classify_context(at(-1.5177, 37.2634), "Machakos County, Kenya");
        assert_eq!(ctx.climate_zone, ClimateZone::SemiArid);
        assert_eq!(ctx.avg_rainfall, 500);
        assert_eq!(ctx.primary_threats, vec!["soil erosion", "drought", "deforestation"]);
    }

    #[test]
    fn sahel_and_desert_are_arid() {
        for region in ["Sahel Region, Niger", "Rajasthan Desert, India"] {
            let ctx = classify_context(at(13.5116, 2.1254), region);
            assert_eq!(ctx.climate_zone, ClimateZone::Arid, "{region}");
            assert_eq!(ctx.avg_rainfall, 200);
            assert_eq!(ctx.primary_threats, vec!["desertification", "drought", "overgrazing"]);
        }
    }

    #[test]
    fn latitude_defaults() {
        let tropical = classify_context(at(-3.4, -62.2), "");
        assert_eq!((tropical.climate_zone, tropical.avg_rainfall), (ClimateZone::Tropical, 1200));

        let north = classify_context(at(52.0, 5.0), "Utrecht");
        assert_eq!((north.climate_zone, north.avg_rainfall), (ClimateZone::Temperate, 600));

        let mid = classify_context(at(-23.5505, -46.6333), "São Paulo Farmland, Brazil");
        assert_eq!((mid.climate_zone, mid.avg_rainfall), (ClimateZone::Temperate, 800));
        assert_eq!(mid.primary_threats, vec!["soil erosion", "climate variability"]);
    }

    #[test]
    fn band_edges() {
        // 23.5 and 40 themselves both fall in the mid band.
        assert_eq!(classify_context(at(23.5, 0.0), "x").avg_rainfall, 800);
        assert_eq!(classify_context(at(-40.0, 0.0), "x").avg_rainfall, 800);
        assert_eq!(classify_context(at(40.01, 0.0), "x").avg_rainfall, 600);
    }

    #[test]
    fn zone_serializes_kebab_case() {
        let json = serde_json::to_string(&ClimateZone::SemiArid).unwrap();
        assert_eq!(json, "\"semi-arid\"");
        assert_eq!(ClimateZone::SemiArid.as_str(), "semi-arid");
    }

    #[test]
    fn site_profile_elevation_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let p = site_profile(&mut rng);
            assert!(p.elevation <= 2000);
            assert_eq!(p.soil_type, "mixed");
        }
    }
}
