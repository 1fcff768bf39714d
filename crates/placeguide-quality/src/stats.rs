use placeguide_core::models::{NearbyGroup, QualityStats, RejectionReason, Verdict};

/// Summarize a batch of verdicts and the groups built from accepted candidates
///
/// Pure: returns a fresh value on every call. Every rejection reason is
/// present in the breakdown, with zero when unused.
pub fn calculate_quality_stats(verdicts: &[Verdict], groups: &[NearbyGroup]) -> QualityStats {
    let mut stats = QualityStats {
        rejections: RejectionReason::ALL.iter().map(|r| (*r, 0)).collect(),
        ..QualityStats::default()
    };

    for verdict in verdicts {
        stats.total_evaluated += 1;
        match verdict {
            Verdict::Accepted => stats.total_accepted += 1,
            Verdict::Rejected(reason) => {
                stats.total_rejected += 1;
                *stats.rejections.entry(*reason).or_insert(0) += 1;
            }
        }
    }

    stats.acceptance_rate = if stats.total_evaluated == 0 {
        0.0
    } else {
        stats.total_accepted as f64 / stats.total_evaluated as f64
    };

    for group in groups {
        let size = group.size();
        stats.group_count += 1;
        if group.is_singleton() {
            stats.singleton_groups += 1;
        } else {
            stats.multi_member_groups += 1;
        }
        stats.largest_group_size = stats.largest_group_size.max(size);
        *stats.group_size_distribution.entry(size).or_insert(0) += 1;
    }

    stats
}
