use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::RejectionReason;

/// Read-only summary of one batch run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityStats {
    pub total_evaluated: usize,
    pub total_accepted: usize,
    pub total_rejected: usize,

    /// Count per rejection reason; every reason is present
    pub rejections: BTreeMap<RejectionReason, usize>,

    /// `total_accepted / total_evaluated`, 0 for an empty batch
    pub acceptance_rate: f64,

    pub group_count: usize,
    pub singleton_groups: usize,
    pub multi_member_groups: usize,
    pub largest_group_size: usize,

    /// Group size -> number of groups with that size
    pub group_size_distribution: BTreeMap<usize, usize>,
}

impl QualityStats {
    /// Number of candidates rejected for `reason`
    pub fn rejected_for(&self, reason: RejectionReason) -> usize {
        self.rejections.get(&reason).copied().unwrap_or(0)
    }
}
