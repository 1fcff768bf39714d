use placeguide_core::models::{Candidate, Coordinate, NearbyGroup};
use placeguide_geo::nearby_components;

/// Group candidates that sit within `threshold_meters` of each other
///
/// Single-linkage: two candidates share a group when a chain of candidates,
/// each hop within the threshold, connects them. Groups are ordered by
/// first appearance of their seed in `candidates`; members keep the order in
/// which they joined. Every candidate lands in exactly one group.
pub fn find_nearby_groups(candidates: &[Candidate], threshold_meters: f64) -> Vec<NearbyGroup> {
    let coordinates: Vec<Coordinate> = candidates.iter().map(|c| c.coordinate).collect();

    nearby_components(&coordinates, threshold_meters)
        .into_iter()
        .filter_map(|component| {
            let members = component.into_iter().map(|i| candidates[i].clone()).collect();
            NearbyGroup::from_members(members)
        })
        .collect()
}
