use placeguide_core::error::CandidateFailure;
use placeguide_core::models::{
    Candidate, CategoryId, NearbyGroup, QualityStats, RejectionReason, Verdict,
};
use serde::Serialize;

/// Full check trace for one candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub candidate_id: String,
    pub category: CategoryId,

    /// Same verdict the short-circuiting evaluation returns
    pub verdict: Verdict,

    /// Haversine distance to the anchor
    pub distance_meters: f64,

    pub walking_minutes: f64,

    /// Present signals that count for the category
    pub signal_count: usize,

    pub required_signals: usize,

    /// Every failing check, in check order
    pub failed_checks: Vec<RejectionReason>,
}

/// Verdict for one candidate in a batch report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateVerdict {
    pub candidate_id: String,
    pub name: String,
    pub category: CategoryId,
    pub verdict: Verdict,
}

impl CandidateVerdict {
    pub fn new(candidate: &Candidate, verdict: Verdict) -> Self {
        Self {
            candidate_id: candidate.id.clone(),
            name: candidate.name.clone(),
            category: candidate.category.clone(),
            verdict,
        }
    }
}

/// Result of one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Verdicts in input order; failed candidates are absent
    pub verdicts: Vec<CandidateVerdict>,

    /// Nearby groups over the accepted candidates
    pub groups: Vec<NearbyGroup>,

    pub stats: QualityStats,

    /// Candidates skipped because they could not be evaluated
    pub failures: Vec<CandidateFailure>,

    /// Check traces, present when explanation was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanations: Option<Vec<Evaluation>>,
}

impl BatchReport {
    /// Candidates that passed every check, in input order
    pub fn accepted_ids(&self) -> impl Iterator<Item = &str> {
        self.verdicts
            .iter()
            .filter(|v| v.verdict.is_accepted())
            .map(|v| v.candidate_id.as_str())
    }

    /// Verdict recorded for a candidate id
    pub fn verdict_for(&self, candidate_id: &str) -> Option<Verdict> {
        self.verdicts
            .iter()
            .find(|v| v.candidate_id == candidate_id)
            .map(|v| v.verdict)
    }

    /// Group containing a candidate id
    pub fn group_of(&self, candidate_id: &str) -> Option<&NearbyGroup> {
        self.groups
            .iter()
            .find(|g| g.member_ids().any(|id| id == candidate_id))
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
