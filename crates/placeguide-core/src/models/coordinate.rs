//! WGS-84 coordinate value type.

use crate::error::{PlaceguideError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Latitude/longitude pair in decimal degrees
///
/// Values constructed through [`Coordinate::new`] or [`FromStr`] always satisfy
/// `-90 <= lat <= 90` and `-180 <= lng <= 180`. Deserialized values are not
/// checked until [`Coordinate::validate`] is called.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Create a validated coordinate
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let coordinate = Self { lat, lng };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check the range invariant
    pub fn validate(&self) -> Result<()> {
        let reason = if !self.lat.is_finite() || !self.lng.is_finite() {
            "coordinates must be finite"
        } else if !(-90.0..=90.0).contains(&self.lat) {
            "latitude must be within [-90, 90]"
        } else if !(-180.0..=180.0).contains(&self.lng) {
            "longitude must be within [-180, 180]"
        } else {
            return Ok(());
        };

        Err(PlaceguideError::InvalidCoordinate {
            lat: self.lat,
            lng: self.lng,
            reason: reason.to_string(),
        })
    }

    /// Whether the range invariant holds
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Parses `"lat,lng"`, the form used by the CLI and `PLACEGUIDE_ANCHOR`
impl FromStr for Coordinate {
    type Err = PlaceguideError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PlaceguideError::ConfigInvalid {
            key: "coordinate".to_string(),
            reason: format!("Invalid coordinate '{}'. Use LAT,LNG (e.g. 59.9139,10.7522)", s),
        };

        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;

        Coordinate::new(lat, lng)
    }
}

/// `geo` uses x = longitude, y = latitude
impl From<Coordinate> for geo::Point<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.lng, c.lat)
    }
}

impl From<geo::Point<f64>> for Coordinate {
    fn from(p: geo::Point<f64>) -> Self {
        Self { lat: p.y(), lng: p.x() }
    }
}
