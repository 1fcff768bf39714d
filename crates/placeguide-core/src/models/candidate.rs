use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{CategoryId, Coordinate};

/// Open/closed status reported by the places provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OpenStatus {
    Open,
    Closed,
    /// The provider did not say
    #[default]
    Unknown,
}

/// A raw quality signal value
///
/// The signal set is provider-defined, so values are kept loosely typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl SignalValue {
    /// Whether this value counts as corroborating evidence
    ///
    /// Numbers must be strictly positive, booleans true and text non-blank.
    pub fn is_present(&self) -> bool {
        match self {
            SignalValue::Bool(b) => *b,
            SignalValue::Number(n) => n.is_finite() && *n > 0.0,
            SignalValue::Text(t) => !t.trim().is_empty(),
        }
    }
}

/// A place entry under evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Provider identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Assigned category
    pub category: CategoryId,

    /// Location of the place
    pub coordinate: Coordinate,

    #[serde(default)]
    pub status: OpenStatus,

    /// Raw quality signals; `null` values deserialize as `None`
    #[serde(default)]
    pub signals: BTreeMap<String, Option<SignalValue>>,
}

impl Candidate {
    /// Create a candidate with unknown status and no signals
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<CategoryId>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            coordinate,
            status: OpenStatus::Unknown,
            signals: BTreeMap::new(),
        }
    }

    /// Set the open/closed status
    pub fn with_status(mut self, status: OpenStatus) -> Self {
        self.status = status;
        self
    }

    /// Add a signal value
    pub fn with_signal(mut self, name: impl Into<String>, value: SignalValue) -> Self {
        self.signals.insert(name.into(), Some(value));
        self
    }

    /// Add an explicitly null signal
    pub fn with_null_signal(mut self, name: impl Into<String>) -> Self {
        self.signals.insert(name.into(), None);
        self
    }

    /// Names of signals that count as present
    pub fn present_signals(&self) -> impl Iterator<Item = &str> {
        self.signals
            .iter()
            .filter(|(_, value)| value.as_ref().is_some_and(SignalValue::is_present))
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_presence() {
        assert!(SignalValue::Number(4.5).is_present());
        assert!(!SignalValue::Number(0.0).is_present());
        assert!(!SignalValue::Number(-1.0).is_present());
        assert!(!SignalValue::Number(f64::NAN).is_present());
        assert!(SignalValue::Bool(true).is_present());
        assert!(!SignalValue::Bool(false).is_present());
        assert!(SignalValue::Text("https://example.no".into()).is_present());
        assert!(!SignalValue::Text("   ".into()).is_present());
    }

    #[test]
    fn test_candidate_deserialization() {
        let json = r#"{
            "id": "p1",
            "name": "Pizza Bar",
            "category": "restaurant",
            "coordinate": {"lat": 59.9157, "lng": 10.7522},
            "status": "open",
            "signals": {"rating": 4.2, "review_count": 0, "website": true, "phone": null}
        }"#;

        let candidate: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.status, OpenStatus::Open);
        assert_eq!(candidate.category.as_str(), "restaurant");
        assert_eq!(candidate.signals.len(), 4);
        assert_eq!(candidate.signals["phone"], None);

        let present: Vec<&str> = candidate.present_signals().collect();
        assert_eq!(present, vec!["rating", "website"]);
    }

    #[test]
    fn test_status_defaults_to_unknown() {
        let json = r#"{
            "id": "p2",
            "name": "Kafe",
            "category": "cafe",
            "coordinate": {"lat": 59.9, "lng": 10.7}
        }"#;

        let candidate: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.status, OpenStatus::Unknown);
        assert!(candidate.signals.is_empty());
    }
}
