use geo::{Centroid, MultiPoint, Point};
use serde::Serialize;

use super::{Candidate, Coordinate};

/// Accepted candidates close enough to be the same place or a tight cluster
///
/// Always non-empty. Members keep the order in which they joined the group,
/// seed first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyGroup {
    members: Vec<Candidate>,
    centroid: Coordinate,
}

impl NearbyGroup {
    /// Build a group from its members; `None` when `members` is empty
    pub fn from_members(members: Vec<Candidate>) -> Option<Self> {
        let points: Vec<Point<f64>> = members.iter().map(|c| c.coordinate.into()).collect();
        let centroid = MultiPoint::new(points).centroid()?;

        Some(Self { members, centroid: centroid.into() })
    }

    pub fn members(&self) -> &[Candidate] {
        &self.members
    }

    pub fn into_members(self) -> Vec<Candidate> {
        self.members
    }

    /// The candidate that opened the group
    pub fn seed(&self) -> &Candidate {
        &self.members[0]
    }

    /// Arithmetic mean of member latitudes and longitudes
    pub fn centroid(&self) -> Coordinate {
        self.centroid
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|c| c.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, lat: f64, lng: f64) -> Candidate {
        Candidate::new(id, id, "cafe", Coordinate::new(lat, lng).unwrap())
    }

    #[test]
    fn test_empty_group_is_not_constructed() {
        assert!(NearbyGroup::from_members(vec![]).is_none());
    }

    #[test]
    fn test_centroid_is_arithmetic_mean() {
        let group = NearbyGroup::from_members(vec![
            candidate("a", 59.0, 10.0),
            candidate("b", 60.0, 11.0),
            candidate("c", 61.0, 12.0),
        ])
        .unwrap();

        let centroid = group.centroid();
        assert!((centroid.lat - 60.0).abs() < 1e-9);
        assert!((centroid.lng - 11.0).abs() < 1e-9);
        assert_eq!(group.size(), 3);
        assert_eq!(group.seed().id, "a");
        assert!(!group.is_singleton());
    }

    #[test]
    fn test_singleton_centroid_is_member() {
        let group = NearbyGroup::from_members(vec![candidate("solo", 59.91, 10.75)]).unwrap();
        assert!(group.is_singleton());
        assert_eq!(group.centroid(), Coordinate::new(59.91, 10.75).unwrap());
        assert_eq!(group.member_ids().collect::<Vec<_>>(), vec!["solo"]);
    }
}
