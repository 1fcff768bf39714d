use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a candidate failed screening
///
/// Variants are declared in check priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    /// Business is explicitly closed
    Closed,
    /// Distance from the anchor is outside the category envelope
    OutOfRange,
    /// Too few corroborating quality signals
    InsufficientSignals,
    /// Name points to a different category
    NameMismatch,
}

impl RejectionReason {
    /// Every reason, in check priority order
    pub const ALL: [RejectionReason; 4] = [
        RejectionReason::Closed,
        RejectionReason::OutOfRange,
        RejectionReason::InsufficientSignals,
        RejectionReason::NameMismatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::Closed => "CLOSED",
            RejectionReason::OutOfRange => "OUT_OF_RANGE",
            RejectionReason::InsufficientSignals => "INSUFFICIENT_SIGNALS",
            RejectionReason::NameMismatch => "NAME_MISMATCH",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "lowercase")]
pub enum Verdict {
    Accepted,
    Rejected(RejectionReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected(reason) => Some(*reason),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => f.write_str("ACCEPTED"),
            Verdict::Rejected(reason) => write!(f, "REJECTED({})", reason),
        }
    }
}
