//! Free text to canonical location, with a time-bounded cache.
//!
//! The cache is keyed by the trimmed, lowercased query and lives for the whole
//! process. Entries are replaced on re-resolution and never evicted; failures
//! are never cached.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::constants::*;
use crate::error::PrayerError;
use crate::geo::ranker::{self, is_settlement_like};
use crate::geo::search::PlaceSearch;
use crate::geo::types::{GeoCandidate, RawPlace, ResolvedLocation, first_non_empty};
use crate::time_source::TimeSource;

/// Cache key for a query: trimmed and lowercased.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// True when the text is long enough to be worth a suggestion search.
pub fn is_searchable(text: &str) -> bool {
    text.trim().chars().count() >= MIN_QUERY_CHARS
}

/// Pick the hit a full search resolves to.
///
/// Tier 1: the first settlement-like hit with importance above 0.3.
/// Tier 2: the hit with the highest importance, first one on ties.
/// Only hits with valid coordinates are considered.
pub fn select_best_match(hits: &[RawPlace]) -> Option<&RawPlace> {
    let usable = || hits.iter().filter(|hit| hit.coordinates().is_some());

    usable()
        .find(|hit| {
            is_settlement_like(
                hit.place_type.as_deref().unwrap_or(""),
                hit.place_class.as_deref().unwrap_or(""),
            ) && hit.importance_or_zero() > MIN_BEST_MATCH_IMPORTANCE
        })
        .or_else(|| {
            usable().reduce(|best, hit| {
                if hit.importance_or_zero() > best.importance_or_zero() {
                    hit
                } else {
                    best
                }
            })
        })
}

/// Canonical city name of a hit; the first non-empty source wins.
pub fn extract_city_name(hit: &RawPlace, query: &str) -> String {
    let address = hit.address.clone().unwrap_or_default();
    first_non_empty([
        address.city.as_deref(),
        address.town.as_deref(),
        address.village.as_deref(),
        address.municipality.as_deref(),
        address.county.as_deref(),
        address.state_district.as_deref(),
        hit.display_name
            .as_deref()
            .and_then(|name| name.split(',').next()),
        Some(query),
    ])
    .unwrap_or_else(|| query.to_string())
}

/// Resolves free text to coordinates through a [`PlaceSearch`] service.
pub struct LocationResolver<S> {
    search: S,
    cache: HashMap<String, ResolvedLocation>,
    ttl: Duration,
    clock: Arc<dyn TimeSource>,
}

impl<S: PlaceSearch> LocationResolver<S> {
    pub fn new(search: S, ttl_hours: u64, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            search,
            cache: HashMap::new(),
            ttl: Duration::hours(ttl_hours as i64),
            clock,
        }
    }

    /// Resolve a query, answering from the cache while the entry is fresh.
    ///
    /// # Errors
    ///
    /// - [`PrayerError::NotFound`] when no hit has usable coordinates.
    /// - Upstream errors from the search service, unchanged.
    pub async fn resolve(&mut self, query: &str) -> Result<ResolvedLocation, PrayerError> {
        let key = normalize_query(query);
        if let Some(cached) = self.cached(&key) {
            log_debug!("Geocode cache hit for \"{}\"", key);
            return Ok(cached.clone());
        }

        let hits = self.search.search(query.trim(), RESOLVE_FETCH_LIMIT).await?;
        let best = select_best_match(&hits).ok_or_else(|| PrayerError::NotFound {
            query: query.trim().to_string(),
        })?;
        let (latitude, longitude) = best
            .coordinates()
            .ok_or_else(|| PrayerError::NotFound {
                query: query.trim().to_string(),
            })?;

        let resolved = ResolvedLocation {
            latitude,
            longitude,
            city_name: extract_city_name(best, query.trim()),
            resolved_at: self.clock.now().with_timezone(&Utc),
        };
        log_debug!(
            "Resolved \"{}\" to {} ({:.4}, {:.4})",
            key,
            resolved.city_name,
            latitude,
            longitude
        );
        self.cache.insert(key, resolved.clone());
        Ok(resolved)
    }

    /// Ranked suggestions for interactive input. Short input never hits the network.
    pub async fn suggest(&self, text: &str) -> Result<Vec<GeoCandidate>, PrayerError> {
        if !is_searchable(text) {
            return Ok(Vec::new());
        }
        let hits = self
            .search
            .search(text.trim(), SUGGESTION_FETCH_LIMIT)
            .await?;
        Ok(ranker::rank(&hits))
    }

    /// The fresh cache entry for a query, if any.
    pub fn cached(&self, query: &str) -> Option<&ResolvedLocation> {
        let now = self.clock.now().with_timezone(&Utc);
        self.cache
            .get(&normalize_query(query))
            .filter(|entry| now - entry.resolved_at < self.ttl)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
