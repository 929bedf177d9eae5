//! Application-wide constants.
//!
//! Defaults for configurable values, the ranking tiers used for place search,
//! and the limits the validation layer enforces.

// # Remote services

pub const DEFAULT_GEOCODE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_TIMINGS_URL: &str = "https://api.aladhan.com/v1";
pub const DEFAULT_USER_AGENT: &str = "PrayerTimesApp/1.0";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Envelope status code the timings service uses for success.
pub const TIMINGS_SUCCESS_CODE: u16 = 200;

// # Place search

/// Hits requested for interactive suggestions.
pub const SUGGESTION_FETCH_LIMIT: usize = 15;
/// Hits requested when resolving a full search.
pub const RESOLVE_FETCH_LIMIT: usize = 5;
/// Maximum number of ranked candidates handed to the UI.
pub const MAX_CANDIDATES: usize = 8;
/// Shorter input never reaches the network.
pub const MIN_QUERY_CHARS: usize = 2;

pub const SETTLEMENT_PRIORITY: f64 = 100.0;
pub const PLACE_CLASS_PRIORITY: f64 = 50.0;
pub const ADMINISTRATIVE_PRIORITY: f64 = 30.0;
pub const LOCALITY_PRIORITY: f64 = 20.0;
pub const OTHER_PRIORITY: f64 = 10.0;
pub const IMPORTANCE_WEIGHT: f64 = 10.0;

/// Ranked suggestions must be strictly more important than this.
pub const MIN_SUGGESTION_IMPORTANCE: f64 = 0.05;
/// Best-match tier for full searches requires more than this.
pub const MIN_BEST_MATCH_IMPORTANCE: f64 = 0.3;

pub const SETTLEMENT_TYPES: &[&str] = &["city", "town", "village", "municipality"];
pub const ADMINISTRATIVE_TYPES: &[&str] = &["administrative", "suburb", "district", "county"];
pub const LOCALITY_TYPES: &[&str] = &["hamlet", "locality", "neighbourhood"];
pub const EXCLUDED_TYPES: &[&str] = &[
    "building", "house", "road", "street", "path", "bridge", "tunnel",
];

// # Cache and scheduling

pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24;
pub const MINIMUM_CACHE_TTL_HOURS: u64 = 1;
pub const MAXIMUM_CACHE_TTL_HOURS: u64 = 168;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const MINIMUM_DEBOUNCE_MS: u64 = 50;
pub const MAXIMUM_DEBOUNCE_MS: u64 = 5000;

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
pub const MINIMUM_TICK_INTERVAL_MS: u64 = 100;
pub const MAXIMUM_TICK_INTERVAL_MS: u64 = 10_000;

pub const MINIMUM_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAXIMUM_REQUEST_TIMEOUT_SECS: u64 = 120;

// # Calculation methods

/// Method used when neither the preference store nor the config names one.
pub const DEFAULT_CALCULATION_METHOD: u8 = 2;
pub const MAXIMUM_CALCULATION_METHOD: u8 = 23;

// # Exit codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
