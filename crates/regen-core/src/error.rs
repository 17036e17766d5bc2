//! Error types for the analysis engine.

use thiserror::Error;

/// Main error type for regen-core operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Coordinate out of range: lat={lat}, lng={lng} (expected lat in [-90, 90], lng in [-180, 180])")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("Region label is required")]
    MissingRegion,

    #[error("Coordinates are required")]
    MissingCoordinates,

    /// Trend too short, or starting at zero, to compute a decline ratio.
    #[error("Degenerate trend: {len} value(s), first = {first:?}")]
    DegenerateTrend { len: usize, first: Option<f64> },

    #[error("Invalid config: {field} ({reason})")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Summary generation failed: {0}")]
    Summary(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors caused by bad caller input. These are surfaced
    /// directly and never retried.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidCoordinate { .. }
                | Error::MissingRegion
                | Error::MissingCoordinates
                | Error::Json(_)
        )
    }
}

/// Result type alias for regen-core operations.
pub type Result<T> = std::result::Result<T, Error>;
