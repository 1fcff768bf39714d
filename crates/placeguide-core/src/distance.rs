//! Great-circle distance and walking-time conversions

use crate::models::Coordinate;

/// Mean Earth radius used by the haversine formula, in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Constant pedestrian speed (~4.8 km/h)
pub const WALK_METERS_PER_MINUTE: f64 = 80.0;

/// Calculate the great-circle distance between two coordinates in meters
///
/// Uses the haversine formula. Symmetric, and zero for identical coordinates.
/// Coordinates are expected to satisfy the [`Coordinate`] range invariant.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);

    // Rounding can push h a hair above 1 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_METERS * c
}

/// Convert a walking distance in meters to minutes
pub fn walking_minutes(meters: f64) -> f64 {
    meters / WALK_METERS_PER_MINUTE
}

/// Convert a walking time budget in minutes to meters
pub fn walking_meters(minutes: f64) -> f64 {
    minutes * WALK_METERS_PER_MINUTE
}
