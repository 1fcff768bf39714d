pub mod candidate;
pub mod category;
pub mod coordinate;
pub mod group;
pub mod stats;
pub mod verdict;

pub use candidate::{Candidate, OpenStatus, SignalValue};
pub use category::{CategoryId, CategoryPolicy, CategoryTable, DistanceEnvelope};
pub use coordinate::Coordinate;
pub use group::NearbyGroup;
pub use stats::QualityStats;
pub use verdict::{RejectionReason, Verdict};
