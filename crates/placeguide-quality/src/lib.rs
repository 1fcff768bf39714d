//! PlaceGuide Quality - Candidate screening, grouping and batch statistics
//!
//! This crate implements the quality use cases: per-candidate verdicts from an
//! ordered chain of checks, nearby-group clustering of accepted candidates,
//! and the batch pipeline that ties them together.

pub mod evaluator;
pub mod grouping;
pub mod models;
pub mod pipeline;
pub mod signals;
pub mod stats;

pub use evaluator::{evaluate, evaluate_with_policy, QualityCheck, QualityEvaluator, CHECK_ORDER};
pub use grouping::find_nearby_groups;
pub use models::{BatchReport, CandidateVerdict, Evaluation};
pub use pipeline::QualityPipeline;
pub use signals::{
    count_quality_signals, has_minimum_quality_signals, is_business_closed,
    is_name_category_mismatch, is_within_category_distance,
};
pub use stats::calculate_quality_stats;
