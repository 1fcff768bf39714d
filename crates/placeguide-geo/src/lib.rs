//! PlaceGuide Geo - Proximity lookup and nearby grouping
//!
//! This crate handles the spatial side of the engine: an R-tree backed
//! proximity index and the single-linkage clustering built on top of it.

pub mod cluster;
pub mod index;

pub use cluster::{nearby_components, DisjointSet};
pub use index::ProximityIndex;
pub use placeguide_core::distance::{distance_meters, walking_meters, walking_minutes};
