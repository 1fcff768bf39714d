//! Candidate screening as an ordered chain of checks.

use placeguide_core::distance::{distance_meters, walking_minutes};
use placeguide_core::error::Result;
use placeguide_core::models::{
    Candidate, CategoryPolicy, CategoryTable, Coordinate, RejectionReason, Verdict,
};

use crate::models::Evaluation;
use crate::signals::{
    count_quality_signals, has_minimum_quality_signals, is_business_closed,
    is_name_category_mismatch, is_within_category_distance,
};

/// One screening step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityCheck {
    Closure,
    CategoryDistance,
    SignalCount,
    NameCategory,
}

/// Checks in the order they run; the first failure decides the verdict
pub const CHECK_ORDER: [QualityCheck; 4] = [
    QualityCheck::Closure,
    QualityCheck::CategoryDistance,
    QualityCheck::SignalCount,
    QualityCheck::NameCategory,
];

impl QualityCheck {
    /// Reason reported when this check fails
    pub fn rejection(self) -> RejectionReason {
        match self {
            QualityCheck::Closure => RejectionReason::Closed,
            QualityCheck::CategoryDistance => RejectionReason::OutOfRange,
            QualityCheck::SignalCount => RejectionReason::InsufficientSignals,
            QualityCheck::NameCategory => RejectionReason::NameMismatch,
        }
    }

    /// Whether the candidate passes this check
    pub fn passes(self, candidate: &Candidate, anchor: Coordinate, policy: &CategoryPolicy) -> bool {
        match self {
            QualityCheck::Closure => !is_business_closed(candidate),
            QualityCheck::CategoryDistance => {
                is_within_category_distance(candidate, anchor, policy)
            }
            QualityCheck::SignalCount => has_minimum_quality_signals(candidate, policy),
            QualityCheck::NameCategory => !is_name_category_mismatch(candidate, policy),
        }
    }
}

/// Run the checks in [`CHECK_ORDER`] against an already resolved policy
///
/// The candidate coordinate must already be valid.
pub fn evaluate_with_policy(
    candidate: &Candidate,
    anchor: Coordinate,
    policy: &CategoryPolicy,
) -> Verdict {
    CHECK_ORDER
        .iter()
        .find(|check| !check.passes(candidate, anchor, policy))
        .map_or(Verdict::Accepted, |check| Verdict::Rejected(check.rejection()))
}

/// Evaluate one candidate against the category table
///
/// Fails with `UnknownCategory` when the candidate's category is not
/// configured, and with `InvalidCoordinate` when the candidate or anchor
/// coordinate is out of range. Rejections are verdicts, not errors.
pub fn evaluate(
    candidate: &Candidate,
    anchor: Coordinate,
    categories: &CategoryTable,
) -> Result<Verdict> {
    QualityEvaluator::new(categories, anchor)?.evaluate(candidate)
}

/// Evaluator bound to one batch's category table and anchor
#[derive(Debug, Clone, Copy)]
pub struct QualityEvaluator<'a> {
    categories: &'a CategoryTable,
    anchor: Coordinate,
}

impl<'a> QualityEvaluator<'a> {
    /// Create an evaluator; the anchor is validated once here
    pub fn new(categories: &'a CategoryTable, anchor: Coordinate) -> Result<Self> {
        anchor.validate()?;
        Ok(Self { categories, anchor })
    }

    pub fn anchor(&self) -> Coordinate {
        self.anchor
    }

    /// Short-circuiting verdict for one candidate
    pub fn evaluate(&self, candidate: &Candidate) -> Result<Verdict> {
        let policy = self.resolve(candidate)?;
        let verdict = evaluate_with_policy(candidate, self.anchor, policy);

        if let Verdict::Rejected(reason) = verdict {
            tracing::debug!(candidate = %candidate.id, %reason, "Candidate rejected");
        }

        Ok(verdict)
    }

    /// Run every check without short-circuiting
    ///
    /// The reported verdict is identical to [`QualityEvaluator::evaluate`];
    /// `failed_checks` additionally lists every check that would fail.
    pub fn explain(&self, candidate: &Candidate) -> Result<Evaluation> {
        let policy = self.resolve(candidate)?;

        let failed_checks: Vec<RejectionReason> = CHECK_ORDER
            .iter()
            .filter(|check| !check.passes(candidate, self.anchor, policy))
            .map(|check| check.rejection())
            .collect();

        let verdict = failed_checks.first().map_or(Verdict::Accepted, |r| Verdict::Rejected(*r));
        let distance = distance_meters(candidate.coordinate, self.anchor);

        Ok(Evaluation {
            candidate_id: candidate.id.clone(),
            category: candidate.category.clone(),
            verdict,
            distance_meters: distance,
            walking_minutes: walking_minutes(distance),
            signal_count: count_quality_signals(candidate, policy),
            required_signals: policy.min_signals,
            failed_checks,
        })
    }

    fn resolve(&self, candidate: &Candidate) -> Result<&'a CategoryPolicy> {
        let policy = self.categories.require(&candidate.id, &candidate.category)?;
        candidate.coordinate.validate()?;
        Ok(policy)
    }
}
