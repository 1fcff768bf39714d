//! PlaceGuide Core - Domain models, category configuration, and distance primitives
//!
//! This crate contains the data model shared by the quality engine: coordinates,
//! candidates, category policies, verdicts, groups and statistics, together with
//! the error taxonomy and layered engine settings.

pub mod config;
pub mod error;
pub mod distance;
pub mod models;

pub use error::{CandidateFailure, PlaceguideError, Result};
