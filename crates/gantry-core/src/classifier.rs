//! Keyword-based intent classification.
//!
//! Maps a user utterance to the ordered set of backend services worth
//! consulting. Pure function of the lower-cased input; an empty result is
//! a valid answer, not an error.

use crate::domain::service::ServiceKind;

/// Trigger substrings per service, in the fixed priority order of
/// [`ServiceKind::ALL`]. Inclusion order of classified services follows this
/// table, not order of appearance in the text.
const TRIGGERS: [(ServiceKind, &[&str]); 6] = [
    (
        ServiceKind::Compliance,
        &["compliance", "permit", "regulation", "regulatory", "consent"],
    ),
    (ServiceKind::Risk, &["risk", "threat", "issue"]),
    (
        ServiceKind::Hse,
        &["safety", "hse", "incident", "hazard", "near miss"],
    ),
    (
        ServiceKind::Qaqc,
        &["quality", "qaqc", "qa/qc", "inspection", "defect", "snag"],
    ),
    (
        ServiceKind::Schedule,
        &["schedule", "timeline", "deadline", "milestone", "delay", "programme"],
    ),
    (
        ServiceKind::Budget,
        &["budget", "cost", "price", "financial", "spend"],
    ),
];

/// Classify a query into the ordered, duplicate-free set of candidate
/// services.
#[must_use]
pub fn classify(query: &str) -> Vec<ServiceKind> {
    let lowered = query.to_lowercase();
    TRIGGERS
        .iter()
        .filter(|(_, triggers)| triggers.iter().any(|t| lowered.contains(t)))
        .map(|(kind, _)| *kind)
        .collect()
}
