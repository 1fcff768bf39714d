use placeguide_core::distance::{distance_meters, EARTH_RADIUS_METERS};
use placeguide_core::models::Coordinate;
use rstar::{RTree, RTreeObject, AABB};
use std::f64::consts::PI;

/// Slack added to search boxes so points exactly on the threshold survive rounding
const ENVELOPE_PADDING_DEGREES: f64 = 1e-9;

/// Indexed point with its position in the input slice
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedPoint {
    /// Position in the input slice
    index: usize,

    /// `[lng, lat]`
    position: [f64; 2],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

/// Spatial index answering "which points lie within N meters of here"
///
/// Candidate points come from a degree-space R-tree lookup; the final answer
/// is always decided by the haversine distance.
pub struct ProximityIndex {
    tree: RTree<IndexedPoint>,
    coordinates: Vec<Coordinate>,
}

impl ProximityIndex {
    /// Create an index over a slice of coordinates
    pub fn new(coordinates: &[Coordinate]) -> Self {
        let indexed: Vec<IndexedPoint> = coordinates
            .iter()
            .enumerate()
            .map(|(index, c)| IndexedPoint { index, position: [c.lng, c.lat] })
            .collect();

        Self { tree: RTree::bulk_load(indexed), coordinates: coordinates.to_vec() }
    }

    /// Indices of all points within `radius_meters` of `origin`, ascending
    ///
    /// Includes points at exactly `radius_meters`. A negative or non-finite
    /// radius matches nothing.
    pub fn within(&self, origin: Coordinate, radius_meters: f64) -> Vec<usize> {
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            return Vec::new();
        }

        let mut hits: Vec<usize> = search_envelopes(origin, radius_meters)
            .iter()
            .flat_map(|envelope| self.tree.locate_in_envelope(envelope))
            .map(|point| point.index)
            .filter(|&index| distance_meters(origin, self.coordinates[index]) <= radius_meters)
            .collect();

        hits.sort_unstable();
        hits.dedup();
        hits
    }

    /// Get the total number of points in the index
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// Degree-space boxes guaranteed to contain every point within `radius` of `origin`
///
/// The latitude span is exact (a meridian arc is the shortest path between two
/// parallels). The longitude span uses the haversine identity with the
/// smallest cosine of latitude inside the box. Boxes that cross the
/// antimeridian are split in two.
fn search_envelopes(origin: Coordinate, radius_meters: f64) -> Vec<AABB<[f64; 2]>> {
    let angular = radius_meters / EARTH_RADIUS_METERS;
    if angular >= PI {
        return vec![AABB::from_corners([-180.0, -90.0], [180.0, 90.0])];
    }

    let dlat = angular.to_degrees() + ENVELOPE_PADDING_DEGREES;
    let min_lat = origin.lat - dlat;
    let max_lat = origin.lat + dlat;

    // Boxes touching a pole cover every longitude
    if min_lat <= -90.0 || max_lat >= 90.0 {
        return vec![AABB::from_corners(
            [-180.0, min_lat.max(-90.0)],
            [180.0, max_lat.min(90.0)],
        )];
    }

    let widest_lat = min_lat.abs().max(max_lat.abs()).to_radians();
    let spread = (angular / 2.0).sin() / widest_lat.cos();
    if spread >= 1.0 {
        return vec![AABB::from_corners([-180.0, min_lat], [180.0, max_lat])];
    }

    let dlng = (2.0 * spread.asin()).to_degrees() + ENVELOPE_PADDING_DEGREES;
    let min_lng = origin.lng - dlng;
    let max_lng = origin.lng + dlng;

    if min_lng < -180.0 {
        vec![
            AABB::from_corners([-180.0, min_lat], [max_lng, max_lat]),
            AABB::from_corners([min_lng + 360.0, min_lat], [180.0, max_lat]),
        ]
    } else if max_lng > 180.0 {
        vec![
            AABB::from_corners([min_lng, min_lat], [180.0, max_lat]),
            AABB::from_corners([-180.0, min_lat], [max_lng - 360.0, max_lat]),
        ]
    } else {
        vec![AABB::from_corners([min_lng, min_lat], [max_lng, max_lat])]
    }
}
