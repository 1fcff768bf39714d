use placeguide_core::config::{ErrorPolicy, LayeredConfig, DEFAULT_CLUSTER_THRESHOLD_METERS};
use placeguide_core::error::{CandidateFailure, PlaceguideError, Result};
use placeguide_core::models::{Candidate, CategoryTable, Coordinate, Verdict};

use crate::evaluator::QualityEvaluator;
use crate::grouping::find_nearby_groups;
use crate::models::{BatchReport, CandidateVerdict, Evaluation};
use crate::stats::calculate_quality_stats;

/// Batch pipeline: evaluate, group accepted candidates, summarize
#[derive(Debug, Clone)]
pub struct QualityPipeline {
    categories: CategoryTable,
    anchor: Coordinate,
    threshold_meters: f64,
    error_policy: ErrorPolicy,
    explain: bool,
}

impl QualityPipeline {
    /// Create a pipeline with the default threshold and the skip policy
    pub fn new(categories: CategoryTable, anchor: Coordinate) -> Result<Self> {
        anchor.validate()?;
        Ok(Self {
            categories,
            anchor,
            threshold_meters: DEFAULT_CLUSTER_THRESHOLD_METERS,
            error_policy: ErrorPolicy::default(),
            explain: false,
        })
    }

    /// Create a pipeline from resolved settings
    pub fn from_config(config: &LayeredConfig, categories: CategoryTable) -> Result<Self> {
        let anchor = config.require_anchor()?;
        Ok(Self::new(categories, anchor)?
            .with_threshold(config.cluster_threshold_meters.value)
            .with_error_policy(config.error_policy.value))
    }

    pub fn with_threshold(mut self, threshold_meters: f64) -> Self {
        self.threshold_meters = threshold_meters;
        self
    }

    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    /// Attach a full check trace for every evaluated candidate
    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn anchor(&self) -> Coordinate {
        self.anchor
    }

    pub fn threshold_meters(&self) -> f64 {
        self.threshold_meters
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Run the batch
    ///
    /// Candidates that cannot be evaluated are handled by the error policy:
    /// `Skip` records them in the report, `Abort` evaluates the rest of the
    /// batch and then fails with every failing candidate listed.
    pub fn run(&self, candidates: &[Candidate]) -> Result<BatchReport> {
        let evaluator = QualityEvaluator::new(&self.categories, self.anchor)?;

        tracing::info!(
            candidates = candidates.len(),
            threshold_meters = self.threshold_meters,
            "Evaluating batch"
        );

        let mut verdicts = Vec::with_capacity(candidates.len());
        let mut accepted = Vec::new();
        let mut failures = Vec::new();
        let mut explanations: Option<Vec<Evaluation>> = self.explain.then(Vec::new);

        for candidate in candidates {
            match self.evaluate_one(&evaluator, candidate) {
                Ok((verdict, evaluation)) => {
                    if verdict.is_accepted() {
                        accepted.push(candidate.clone());
                    }
                    verdicts.push(CandidateVerdict::new(candidate, verdict));
                    if let (Some(traces), Some(evaluation)) = (explanations.as_mut(), evaluation) {
                        traces.push(evaluation);
                    }
                }
                Err(e) if e.is_candidate_error() => {
                    if self.error_policy == ErrorPolicy::Skip {
                        tracing::warn!(candidate = %candidate.id, error = %e, "Skipping candidate");
                    }
                    failures.push(CandidateFailure::new(&candidate.id, &e));
                }
                Err(e) => return Err(e),
            }
        }

        if self.error_policy == ErrorPolicy::Abort && !failures.is_empty() {
            tracing::warn!(failed = failures.len(), "Aborting batch");
            return Err(PlaceguideError::BatchFailed { failures });
        }

        let groups = find_nearby_groups(&accepted, self.threshold_meters);
        let plain: Vec<Verdict> = verdicts.iter().map(|v| v.verdict).collect();
        let stats = calculate_quality_stats(&plain, &groups);

        tracing::info!(
            evaluated = stats.total_evaluated,
            accepted = stats.total_accepted,
            rejected = stats.total_rejected,
            skipped = failures.len(),
            groups = stats.group_count,
            "Batch complete"
        );

        Ok(BatchReport { verdicts, groups, stats, failures, explanations })
    }

    fn evaluate_one(
        &self,
        evaluator: &QualityEvaluator<'_>,
        candidate: &Candidate,
    ) -> Result<(Verdict, Option<Evaluation>)> {
        if self.explain {
            let evaluation = evaluator.explain(candidate)?;
            Ok((evaluation.verdict, Some(evaluation)))
        } else {
            Ok((evaluator.evaluate(candidate)?, None))
        }
    }
}
