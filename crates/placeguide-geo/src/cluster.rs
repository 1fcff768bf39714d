//! Single-linkage grouping of nearby points.
//!
//! Groups are the connected components of the graph whose edges join points at
//! most `threshold_meters` apart, so chains of close points merge even when the
//! chain ends are far apart. Output order reproduces the greedy scan:
//!
//! 1. walk the input in order; an unassigned point seeds a new group
//! 2. scan the remaining unassigned points in input order, adding any point
//!    within the threshold of a current member (members added during a scan
//!    count for the rest of that scan)
//! 3. repeat the scan until nothing is added
//!
//! The components are found with an R-tree neighbour lookup and a union-find,
//! and the scan is only replayed inside each component to order its members.

use crate::index::ProximityIndex;
use placeguide_core::models::Coordinate;

/// Disjoint-set forest over `0..n`
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Every element starts in its own set
    pub fn new(n: usize) -> Self {
        Self { parent: (0..n).collect(), rank: vec![0; n] }
    }

    /// Representative of the set containing `x`
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // Path halving
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets containing `a` and `b`; false if already merged
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}

/// Partition point indices into nearby groups
///
/// Returns one `Vec` of input indices per group. Groups are ordered by the
/// input position of their seed, members by the order they joined. A
/// threshold that is not a positive number yields one singleton per point.
pub fn nearby_components(coordinates: &[Coordinate], threshold_meters: f64) -> Vec<Vec<usize>> {
    let n = coordinates.len();
    if n == 0 {
        return Vec::new();
    }

    if !(threshold_meters.is_finite() && threshold_meters > 0.0) {
        tracing::debug!(threshold_meters, "Threshold disables merging, emitting singletons");
        return (0..n).map(|i| vec![i]).collect();
    }

    let index = ProximityIndex::new(coordinates);
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sets = DisjointSet::new(n);

    for (i, coordinate) in coordinates.iter().enumerate() {
        for j in index.within(*coordinate, threshold_meters) {
            if j > i {
                neighbors[i].push(j);
                neighbors[j].push(i);
                sets.union(i, j);
            }
        }
    }

    // Components in order of their first (seed) member
    let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
    let mut components: Vec<Vec<usize>> = Vec::new();
    for i in 0..n {
        let root = sets.find(i);
        match slot_of_root[root] {
            Some(slot) => components[slot].push(i),
            None => {
                slot_of_root[root] = Some(components.len());
                components.push(vec![i]);
            }
        }
    }

    let mut assigned = vec![false; n];
    let groups: Vec<Vec<usize>> = components
        .iter()
        .map(|component| absorption_order(component, &neighbors, &mut assigned))
        .collect();

    tracing::debug!(points = n, groups = groups.len(), threshold_meters, "Grouped nearby points");
    groups
}

/// Replay the greedy scan inside one component
///
/// `component` is in input order and fully connected, so every member is
/// eventually absorbed.
fn absorption_order(
    component: &[usize],
    neighbors: &[Vec<usize>],
    assigned: &mut [bool],
) -> Vec<usize> {
    let seed = component[0];
    assigned[seed] = true;
    let mut order = Vec::with_capacity(component.len());
    order.push(seed);

    loop {
        let mut added = false;
        for &idx in &component[1..] {
            if !assigned[idx] && neighbors[idx].iter().any(|&m| assigned[m]) {
                assigned[idx] = true;
                order.push(idx);
                added = true;
            }
        }
        if !added {
            break;
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use placeguide_core::distance::distance_meters;
    use proptest::prelude::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    /// Metres north of Oslo centre
    fn north_of_oslo(meters: f64) -> Coordinate {
        coord(59.9139 + meters / 111_194.93, 10.7522)
    }

    /// The greedy scan, written out literally
    fn reference_scan(coordinates: &[Coordinate], threshold: f64) -> Vec<Vec<usize>> {
        let mut assigned = vec![false; coordinates.len()];
        let mut groups = Vec::new();

        for seed in 0..coordinates.len() {
            if assigned[seed] {
                continue;
            }
            assigned[seed] = true;
            let mut group = vec![seed];

            loop {
                let mut added = false;
                for idx in 0..coordinates.len() {
                    if assigned[idx] {
                        continue;
                    }
                    let near = group
                        .iter()
                        .any(|&m| distance_meters(coordinates[m], coordinates[idx]) <= threshold);
                    if near {
                        assigned[idx] = true;
                        group.push(idx);
                        added = true;
                    }
                }
                if !added {
                    break;
                }
            }

            groups.push(group);
        }

        groups
    }

    #[test]
    fn test_disjoint_set() {
        let mut sets = DisjointSet::new(5);
        assert_eq!(sets.len(), 5);
        assert!(sets.union(0, 1));
        assert!(sets.union(3, 4));
        assert!(!sets.union(1, 0));
        assert_eq!(sets.find(0), sets.find(1));
        assert_ne!(sets.find(1), sets.find(3));
        assert!(sets.union(1, 4));
        assert_eq!(sets.find(0), sets.find(3));
        assert_ne!(sets.find(2), sets.find(0));
    }

    #[test]
    fn test_empty_input() {
        assert!(nearby_components(&[], 50.0).is_empty());
    }

    #[test]
    fn test_non_positive_threshold_gives_singletons() {
        let points = vec![north_of_oslo(0.0), north_of_oslo(0.0), north_of_oslo(10.0)];

        for threshold in [0.0, -5.0, f64::NAN] {
            let groups = nearby_components(&points, threshold);
            assert_eq!(groups, vec![vec![0], vec![1], vec![2]]);
        }
    }

    #[test]
    fn test_transitive_chain_merges() {
        // A-B and B-C are 40m apart, A-C is 80m apart
        let points = vec![north_of_oslo(0.0), north_of_oslo(40.0), north_of_oslo(80.0)];
        assert!(distance_meters(points[0], points[2]) > 50.0);

        let groups = nearby_components(&points, 50.0);
        assert_eq!(groups, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_far_points_stay_apart() {
        let points = vec![north_of_oslo(0.0), north_of_oslo(500.0), north_of_oslo(1000.0)];
        let groups = nearby_components(&points, 50.0);
        assert_eq!(groups, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_group_order_follows_seed_position() {
        // Input: far point, then a pair, then a point near the far one
        let points = vec![
            north_of_oslo(1000.0),
            north_of_oslo(0.0),
            north_of_oslo(20.0),
            north_of_oslo(1010.0),
        ];

        let groups = nearby_components(&points, 50.0);
        assert_eq!(groups, vec![vec![0, 3], vec![1, 2]]);
    }

    #[test]
    fn test_members_follow_absorption_order() {
        // B is only near C, and C is only near A; input order A, B, C.
        // First scan skips B, absorbs C; second scan absorbs B.
        let a = north_of_oslo(0.0);
        let b = north_of_oslo(80.0);
        let c = north_of_oslo(40.0);

        let groups = nearby_components(&[a, b, c], 50.0);
        assert_eq!(groups, vec![vec![0, 2, 1]]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let points = vec![north_of_oslo(0.0), north_of_oslo(30.0)];
        let exact = distance_meters(points[0], points[1]);

        assert_eq!(nearby_components(&points, exact), vec![vec![0, 1]]);
        assert_eq!(nearby_components(&points, exact * 0.999), vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_duplicate_coordinates_group_together() {
        let p = north_of_oslo(100.0);
        let groups = nearby_components(&[p, p, p], 1.0);
        assert_eq!(groups, vec![vec![0, 1, 2]]);
    }

    proptest! {
        #[test]
        fn prop_matches_reference_scan(
            offsets in prop::collection::vec((0.0f64..0.01, 0.0f64..0.02), 0..40),
            threshold in 1.0f64..400.0,
        ) {
            let points: Vec<Coordinate> = offsets
                .iter()
                .map(|(dlat, dlng)| coord(59.9 + dlat, 10.7 + dlng))
                .collect();

            let expected = reference_scan(&points, threshold);
            let actual = nearby_components(&points, threshold);
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn prop_every_point_in_exactly_one_group(
            offsets in prop::collection::vec((0.0f64..0.01, 0.0f64..0.02), 0..40),
            threshold in -10.0f64..400.0,
        ) {
            let points: Vec<Coordinate> = offsets
                .iter()
                .map(|(dlat, dlng)| coord(59.9 + dlat, 10.7 + dlng))
                .collect();

            let groups = nearby_components(&points, threshold);
            let mut seen: Vec<usize> = groups.iter().flatten().copied().collect();
            seen.sort_unstable();

            prop_assert!(groups.iter().all(|g| !g.is_empty()));
            prop_assert_eq!(seen, (0..points.len()).collect::<Vec<_>>());
        }
    }
}
