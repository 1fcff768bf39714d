//! Category identifiers and the per-category policy table.
//!
//! The table is configuration data: adding a category means adding a TOML
//! section, never touching evaluator code.

use crate::distance::walking_meters;
use crate::error::{PlaceguideError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Category identifier such as `restaurant` or `bus_stop`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plausible distance window from the anchor, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceEnvelope {
    pub min_meters: f64,
    /// `None` means unbounded
    pub max_meters: Option<f64>,
}

impl DistanceEnvelope {
    /// Envelope in meters
    pub fn meters(min_meters: f64, max_meters: f64) -> Self {
        Self { min_meters, max_meters: Some(max_meters) }
    }

    /// Envelope expressed as a walking-time budget
    pub fn walking_minutes(min_minutes: f64, max_minutes: f64) -> Self {
        Self::meters(walking_meters(min_minutes), walking_meters(max_minutes))
    }

    /// Only a lower bound
    pub fn at_least(min_meters: f64) -> Self {
        Self { min_meters, max_meters: None }
    }

    /// Whether a distance falls inside the envelope
    pub fn contains(&self, meters: f64) -> bool {
        meters >= self.min_meters && self.max_meters.map_or(true, |max| meters <= max)
    }

    fn validate(&self, key: &str) -> Result<()> {
        let invalid = |reason: String| PlaceguideError::ConfigInvalid { key: key.to_string(), reason };

        if !self.min_meters.is_finite() || self.min_meters < 0.0 {
            return Err(invalid(format!(
                "minimum distance must be a non-negative number, got {}",
                self.min_meters
            )));
        }

        if let Some(max) = self.max_meters {
            if !max.is_finite() || max < 0.0 {
                return Err(invalid(format!(
                    "maximum distance must be a non-negative number, got {}",
                    max
                )));
            }
            if max < self.min_meters {
                return Err(invalid(format!(
                    "maximum distance {} is below minimum distance {}",
                    max, self.min_meters
                )));
            }
        }

        Ok(())
    }
}

/// Screening policy for one category
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryPolicy {
    /// Distance envelope; `None` disables distance filtering
    pub distance: Option<DistanceEnvelope>,

    /// Present signals required before acceptance
    pub min_signals: usize,

    /// Signals that count towards `min_signals`; `None` counts every signal
    pub signal_fields: Option<Vec<String>>,

    /// Lower-cased name markers that contradict this category
    pub mismatch_keywords: Vec<String>,
}

impl CategoryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_envelope(mut self, envelope: DistanceEnvelope) -> Self {
        self.distance = Some(envelope);
        self
    }

    pub fn with_min_signals(mut self, min_signals: usize) -> Self {
        self.min_signals = min_signals;
        self
    }

    pub fn with_signal_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.signal_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_mismatch_keywords(
        mut self,
        keywords: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.mismatch_keywords = keywords.into_iter().map(|k| normalize_keyword(k.into())).collect();
        self
    }

    /// Whether a named signal counts for this category
    pub fn counts_signal(&self, name: &str) -> bool {
        self.signal_fields.as_ref().map_or(true, |fields| fields.iter().any(|f| f == name))
    }
}

fn normalize_keyword(keyword: String) -> String {
    keyword.trim().to_lowercase()
}

/// Known categories and their policies
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTable {
    categories: BTreeMap<CategoryId, CategoryPolicy>,
}

impl CategoryTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a category
    pub fn with_category(mut self, id: impl Into<CategoryId>, policy: CategoryPolicy) -> Self {
        self.insert(id, policy);
        self
    }

    pub fn insert(&mut self, id: impl Into<CategoryId>, policy: CategoryPolicy) {
        self.categories.insert(id.into(), policy);
    }

    /// Look up a category
    pub fn get(&self, id: &CategoryId) -> Option<&CategoryPolicy> {
        self.categories.get(id)
    }

    /// Look up a category, failing loudly when it is not configured
    pub fn require(&self, candidate_id: &str, id: &CategoryId) -> Result<&CategoryPolicy> {
        self.get(id).ok_or_else(|| PlaceguideError::UnknownCategory {
            candidate_id: candidate_id.to_string(),
            category: id.to_string(),
        })
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.categories.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, &CategoryPolicy)> {
        self.categories.iter()
    }

    /// Parse a table from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CategoryFile = toml::from_str(content).map_err(|e| PlaceguideError::ConfigInvalid {
            key: "categories".to_string(),
            reason: format!("Failed to parse TOML: {}", e),
        })?;

        let mut table = Self::new();
        for (id, entry) in file.categories {
            let policy = entry.into_policy(&id)?;
            table.insert(id, policy);
        }

        tracing::debug!("Loaded {} categories", table.len());
        Ok(table)
    }

    /// Load a table from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| PlaceguideError::ConfigInvalid {
                key: "categories".to_string(),
                reason: format!(
                    "Failed to read category table {}: {}",
                    path.as_ref().display(),
                    e
                ),
            })?;

        Self::from_toml_str(&content)
    }
}

/// Category table as written in TOML
#[derive(Debug, Deserialize)]
struct CategoryFile {
    #[serde(default)]
    categories: BTreeMap<String, CategoryEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CategoryEntry {
    min_meters: Option<f64>,
    max_meters: Option<f64>,
    min_walk_minutes: Option<f64>,
    max_walk_minutes: Option<f64>,
    #[serde(default)]
    min_signals: usize,
    signal_fields: Option<Vec<String>>,
    #[serde(default)]
    mismatch_keywords: Vec<String>,
}

impl CategoryEntry {
    fn into_policy(self, id: &str) -> Result<CategoryPolicy> {
        let key = format!("categories.{}", id);

        let min = pick_bound(&key, "min", self.min_meters, self.min_walk_minutes)?;
        let max = pick_bound(&key, "max", self.max_meters, self.max_walk_minutes)?;

        let distance = match (min, max) {
            (None, None) => None,
            (min, max) => Some(DistanceEnvelope { min_meters: min.unwrap_or(0.0), max_meters: max }),
        };

        if let Some(envelope) = &distance {
            envelope.validate(&key)?;
        }

        if self.mismatch_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(PlaceguideError::ConfigInvalid {
                key,
                reason: "mismatch keywords must not be blank".to_string(),
            });
        }

        let mut policy = CategoryPolicy::new()
            .with_min_signals(self.min_signals)
            .with_mismatch_keywords(self.mismatch_keywords);
        policy.distance = distance;
        policy.signal_fields = self.signal_fields;

        Ok(policy)
    }
}

/// A bound may be given in meters or walking minutes, not both
fn pick_bound(
    key: &str,
    which: &str,
    meters: Option<f64>,
    minutes: Option<f64>,
) -> Result<Option<f64>> {
    match (meters, minutes) {
        (Some(_), Some(_)) => Err(PlaceguideError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("set either {which}_meters or {which}_walk_minutes, not both"),
        }),
        (Some(m), None) => Ok(Some(m)),
        (None, Some(minutes)) => Ok(Some(walking_meters(minutes))),
        (None, None) => Ok(None),
    }
}
