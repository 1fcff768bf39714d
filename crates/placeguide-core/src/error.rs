//! Error types for PlaceGuide

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaceguideError {
    // Evaluation errors
    #[error("Unknown category '{category}' for candidate {candidate_id}")]
    UnknownCategory {
        candidate_id: String,
        category: String,
    },

    #[error("Invalid coordinate ({lat}, {lng}): {reason}")]
    InvalidCoordinate { lat: f64, lng: f64, reason: String },

    // Batch errors
    #[error("{} candidate(s) failed evaluation: {}", .failures.len(), join_failures(.failures))]
    BatchFailed { failures: Vec<CandidateFailure> },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PlaceguideError {
    /// Whether this error comes from a single candidate's input rather than
    /// from configuration or I/O
    pub fn is_candidate_error(&self) -> bool {
        matches!(
            self,
            PlaceguideError::UnknownCategory { .. } | PlaceguideError::InvalidCoordinate { .. }
        )
    }
}

/// A candidate that could not be evaluated, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFailure {
    pub candidate_id: String,
    pub reason: String,
}

impl CandidateFailure {
    pub fn new(candidate_id: impl Into<String>, error: &PlaceguideError) -> Self {
        Self { candidate_id: candidate_id.into(), reason: error.to_string() }
    }
}

impl fmt::Display for CandidateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.candidate_id, self.reason)
    }
}

fn join_failures(failures: &[CandidateFailure]) -> String {
    failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

pub type Result<T> = std::result::Result<T, PlaceguideError>;
