//! Geographic coordinate types and bounding boxes.
//! All coordinate math uses f64.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A point on the globe in geographic coordinates.
///
/// Construct through [`Coordinate::new`] so the range check runs; the
/// classification heuristics downstream assume valid ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, -90 to +90.
    pub lat: f64,
    /// Longitude in degrees, -180 to +180.
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        Self { lat, lng }.validated()
    }

    /// Re-check a coordinate that arrived through deserialization.
    pub fn validated(self) -> Result<Self> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lng_ok = self.lng.is_finite() && (-180.0..=180.0).contains(&self.lng);
        if lat_ok && lng_ok {
            Ok(self)
        } else {
            Err(Error::InvalidCoordinate { lat: self.lat, lng: self.lng })
        }
    }

    #[inline]
    pub fn abs_lat(&self) -> f64 {
        self.lat.abs()
    }
}

/// An axis-aligned lat/lng box with open bounds on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBox {
    pub const fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self { min_lat, max_lat, min_lng, max_lng }
    }

    /// Strict containment: points on the edge are outside.
    pub fn contains(&self, c: Coordinate) -> bool {
        c.lat > self.min_lat && c.lat < self.max_lat && c.lng > self.min_lng && c.lng < self.max_lng
    }
}

/// Rough Africa / Middle East extent, where tropical points are treated as
/// prone to desertification rather than rainforest.
pub const AFRICA_MIDDLE_EAST: GeoBox = GeoBox::new(-35.0, 35.0, -20.0, 50.0);
