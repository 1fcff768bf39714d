use chrono::{DateTime, Utc};
use placeguide_core::config::ErrorPolicy;
use placeguide_core::models::{CategoryId, CategoryPolicy, Coordinate};
use placeguide_quality::BatchReport;
use serde::Serialize;
use std::collections::BTreeMap;

/// Output for evaluate command
#[derive(Debug, Serialize)]
pub struct EvaluateOutput<'a> {
    pub input: String,
    pub anchor: Coordinate,
    pub threshold_meters: f64,
    pub error_policy: ErrorPolicy,
    pub evaluated_at: DateTime<Utc>,
    pub geojson: Option<String>,
    #[serde(flatten)]
    pub report: &'a BatchReport,
}

/// Output for categories command
#[derive(Debug, Serialize)]
pub struct CategoriesOutput {
    pub path: String,
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub id: CategoryId,
    pub min_meters: Option<f64>,
    pub max_meters: Option<f64>,
    pub max_walking_minutes: Option<f64>,
    pub min_signals: usize,
    pub signal_fields: Option<Vec<String>>,
    pub mismatch_keywords: Vec<String>,
}

impl CategoryInfo {
    pub fn new(id: &CategoryId, policy: &CategoryPolicy) -> Self {
        let max_meters = policy.distance.and_then(|d| d.max_meters);
        Self {
            id: id.clone(),
            min_meters: policy.distance.map(|d| d.min_meters),
            max_meters,
            max_walking_minutes: max_meters.map(placeguide_core::distance::walking_minutes),
            min_signals: policy.min_signals,
            signal_fields: policy.signal_fields.clone(),
            mismatch_keywords: policy.mismatch_keywords.clone(),
        }
    }
}

/// Output for distance command
#[derive(Debug, Serialize)]
pub struct DistanceOutput {
    pub from: Coordinate,
    pub to: Coordinate,
    pub meters: f64,
    pub walking_minutes: f64,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub config_file: Option<String>,
    pub values: BTreeMap<String, ConfigEntry>,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub value: String,
    pub source: String,
}
