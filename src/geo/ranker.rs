//! Scoring and filtering of place search hits into suggestions.
//!
//! Ranking runs in two ordered tiers:
//!
//! 1. **Ranked**: drop blocklisted place types, hits without finite coordinates
//!    and hits with importance ≤ 0.05, score the rest by place-type tier plus
//!    `importance × 10`, sort descending (stable) and keep the top eight.
//! 2. **Unranked**: when the ranked tier is empty but the service returned hits,
//!    keep every hit with valid coordinates in upstream order, again capped at eight.
//!
//! The sort is stable, so ranking an already-ranked list again leaves it unchanged.

use crate::constants::*;
use crate::geo::types::{GeoCandidate, PlaceHit};

/// Place-type tier that sets the base priority of a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceTier {
    Settlement,
    PlaceClass,
    Administrative,
    Locality,
    Other,
}

impl PlaceTier {
    /// Classify a hit by its type, falling back to its class.
    pub fn classify(place_type: &str, place_class: &str) -> Self {
        let place_type = place_type.to_lowercase();
        if type_matches(&place_type, SETTLEMENT_TYPES) {
            Self::Settlement
        } else if place_class.eq_ignore_ascii_case("place") {
            Self::PlaceClass
        } else if type_matches(&place_type, ADMINISTRATIVE_TYPES) {
            Self::Administrative
        } else if type_matches(&place_type, LOCALITY_TYPES) {
            Self::Locality
        } else {
            Self::Other
        }
    }

    pub fn base_priority(self) -> f64 {
        match self {
            Self::Settlement => SETTLEMENT_PRIORITY,
            Self::PlaceClass => PLACE_CLASS_PRIORITY,
            Self::Administrative => ADMINISTRATIVE_PRIORITY,
            Self::Locality => LOCALITY_PRIORITY,
            Self::Other => OTHER_PRIORITY,
        }
    }
}

fn type_matches(place_type: &str, words: &[&str]) -> bool {
    words.iter().any(|word| place_type.contains(word))
}

/// True for settlements or anything in the `place` class.
pub fn is_settlement_like(place_type: &str, place_class: &str) -> bool {
    matches!(
        PlaceTier::classify(place_type, place_class),
        PlaceTier::Settlement | PlaceTier::PlaceClass
    )
}

/// Final score of a hit: tier base plus weighted importance.
pub fn priority<H: PlaceHit>(hit: &H) -> f64 {
    PlaceTier::classify(hit.place_type(), hit.place_class()).base_priority()
        + hit.importance() * IMPORTANCE_WEIGHT
}

fn is_excluded_type(place_type: &str) -> bool {
    type_matches(&place_type.to_lowercase(), EXCLUDED_TYPES)
}

/// Rank hits into at most eight candidates, degrading to the unranked tier when needed.
pub fn rank<H: PlaceHit>(hits: &[H]) -> Vec<GeoCandidate> {
    let ranked = ranked_tier(hits);
    if ranked.is_empty() && !hits.is_empty() {
        log_debug!(
            "No ranked suggestions among {} hits, using unranked fallback",
            hits.len()
        );
        return unranked_tier(hits);
    }
    ranked
}

fn ranked_tier<H: PlaceHit>(hits: &[H]) -> Vec<GeoCandidate> {
    let mut candidates: Vec<GeoCandidate> = hits
        .iter()
        .filter(|hit| !is_excluded_type(hit.place_type()))
        .filter(|hit| hit.importance() > MIN_SUGGESTION_IMPORTANCE)
        .filter_map(|hit| hit.to_candidate(priority(hit)))
        .collect();

    candidates.sort_by(|a, b| b.priority.total_cmp(&a.priority));
    candidates.truncate(MAX_CANDIDATES);
    candidates
}

fn unranked_tier<H: PlaceHit>(hits: &[H]) -> Vec<GeoCandidate> {
    hits.iter()
        .filter_map(|hit| hit.to_candidate(priority(hit)))
        .take(MAX_CANDIDATES)
        .collect()
}
