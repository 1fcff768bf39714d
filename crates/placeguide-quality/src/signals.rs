//! Independent quality predicates over a single candidate.

use placeguide_core::distance::distance_meters;
use placeguide_core::models::{Candidate, CategoryPolicy, Coordinate, OpenStatus};

/// True only when the provider explicitly reports the business as closed
///
/// An unknown status is not evidence of closure.
pub fn is_business_closed(candidate: &Candidate) -> bool {
    candidate.status == OpenStatus::Closed
}

/// Whether the candidate's distance from the anchor fits the category envelope
///
/// Categories without an envelope accept any distance.
pub fn is_within_category_distance(
    candidate: &Candidate,
    anchor: Coordinate,
    policy: &CategoryPolicy,
) -> bool {
    match &policy.distance {
        Some(envelope) => envelope.contains(distance_meters(candidate.coordinate, anchor)),
        None => true,
    }
}

/// Number of present signals that count for the category
pub fn count_quality_signals(candidate: &Candidate, policy: &CategoryPolicy) -> usize {
    candidate.present_signals().filter(|name| policy.counts_signal(name)).count()
}

/// Whether enough corroborating signals are present
pub fn has_minimum_quality_signals(candidate: &Candidate, policy: &CategoryPolicy) -> bool {
    count_quality_signals(candidate, policy) >= policy.min_signals
}

/// Whether the display name carries a marker of a different category
///
/// Keywords match whole words (or whole word sequences) case-insensitively,
/// so "Kontor" matches "Advokat Kontor" but not "Kontoret".
pub fn is_name_category_mismatch(candidate: &Candidate, policy: &CategoryPolicy) -> bool {
    if policy.mismatch_keywords.is_empty() {
        return false;
    }

    let name_words = words(&candidate.name);
    policy.mismatch_keywords.iter().any(|keyword| {
        let keyword_words = words(keyword);
        !keyword_words.is_empty()
            && name_words.windows(keyword_words.len()).any(|window| window == keyword_words.as_slice())
    })
}

/// Lower-cased alphanumeric words
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}
