//! Demo regions offered to users before they pick their own area.

use serde::{Deserialize, Serialize};

use crate::coords::Coordinate;

/// Qualitative degradation label attached to a demo region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegradationLevel {
    Moderate,
    High,
    Severe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleRegion {
    pub id: u32,
    pub name: String,
    pub coordinates: Coordinate,
    pub country: String,
    pub degradation_level: DegradationLevel,
    pub description: String,
}

fn region(
    id: u32,
    name: &str,
    (lat, lng): (f64, f64),
    country: &str,
    degradation_level: DegradationLevel,
    description: &str,
) -> SampleRegion {
    SampleRegion {
        id,
        name: name.to_string(),
        coordinates: Coordinate { lat, lng },
        country: country.to_string(),
        degradation_level,
        description: description.to_string(),
    }
}

/// The demo catalogue, in display order.
pub fn sample_regions() -> Vec<SampleRegion> {
    use DegradationLevel::*;
    vec![
        region(1, "Machakos County, Kenya", (-1.5177, 37.2634), "Kenya", High,
            "Semi-arid region experiencing severe soil erosion"),
        region(2, "Rajasthan Desert, India", (27.0238, 74.2179), "India", Severe,
            "Desert expansion and drought stress"),
        region(3, "Sahel Region, Niger", (13.5116, 2.1254), "Niger", Severe,
            "Desertification and overgrazing"),
        region(4, "São Paulo Farmland, Brazil", (-23.5505, -46.6333), "Brazil", Moderate,
            "Agricultural intensification impacts"),
        region(5, "Inner Mongolia, China", (40.8142, 111.9562), "China", High,
            "Grassland degradation and desertification"),
    ]
}

/// Case-insensitive lookup by exact name.
pub fn find_region(name: &str) -> Option<SampleRegion> {
    sample_regions()
        .into_iter()
        .find(|r| r.name.to_lowercase() == name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{classify_context, ClimateZone};

    #[test]
    fn catalogue_coordinates_are_valid() {
        let regions = sample_regions();
        assert_eq!(regions.len(), 5);
        for r in &regions {
            assert!(r.coordinates.validated().is_ok(), "{}", r.name);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let r = find_region("sahel region, niger").unwrap();
        assert_eq!(r.id, 3);
        assert!(find_region("Atlantis").is_none());
    }

    #[test]
    fn demo_regions_hit_their_keyword_rules() {
        let zones: Vec<ClimateZone> = sample_regions()
            .iter()
            .map(|r| classify_context(r.coordinates, &r.name).climate_zone)
            .collect();
        assert_eq!(
            zones,
            vec![
                ClimateZone::SemiArid,
                ClimateZone::Arid,
                ClimateZone::Arid,
                ClimateZone::Temperate,
                ClimateZone::Temperate,
            ]
        );
    }

    #[test]
    fn serializes_with_frontend_field_names() {
        let json = serde_json::to_value(&sample_regions()[0]).unwrap();
        assert_eq!(json["degradationLevel"], "high");
        assert_eq!(json["coordinates"]["lng"], 37.2634);
    }
}
