//! Configuration system for waqt.
//!
//! The configuration lives in `waqt.toml`, looked up in:
//! 1. The directory given with `--config <dir>`
//! 2. **XDG_CONFIG_HOME**/waqt/waqt.toml
//!
//! Every field is optional. A missing file means all defaults.
//!
//! ```toml
//! #[Services]
//! geocode_url = "https://nominatim.openstreetmap.org"  # Place search service
//! timings_url = "https://api.aladhan.com/v1"           # Prayer timings service
//! user_agent = "PrayerTimesApp/1.0"                    # Sent with every request
//! request_timeout_secs = 15                            # Per-request timeout (1-120)
//!
//! #[Behaviour]
//! cache_ttl_hours = 24     # How long a resolved place is reused (1-168)
//! debounce_ms = 300        # Quiet period before interactive search (50-5000)
//! tick_interval_ms = 1000  # Clock and countdown refresh period (100-10000)
//! default_method = 2       # Calculation method when none is saved (0-23)
//! ```
//!
//! User preferences (last city, method, theme) are not configuration; they live
//! next to this file in `state.toml`, see [`crate::preferences`].

pub mod loading;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::*;
use crate::schedule::method::CalculationMethod;

pub use loading::{
    get_config_dir, get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir,
};

/// Parsed `waqt.toml`. Accessors apply defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub geocode_url: Option<String>,
    pub timings_url: Option<String>,
    pub user_agent: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub cache_ttl_hours: Option<u64>,
    pub debounce_ms: Option<u64>,
    pub tick_interval_ms: Option<u64>,
    pub default_method: Option<u8>,
}

impl Config {
    /// Load from the configured location. See [`loading::load`].
    pub fn load() -> anyhow::Result<Self> {
        loading::load()
    }

    pub fn geocode_url(&self) -> &str {
        self.geocode_url.as_deref().unwrap_or(DEFAULT_GEOCODE_URL)
    }

    pub fn timings_url(&self) -> &str {
        self.timings_url.as_deref().unwrap_or(DEFAULT_TIMINGS_URL)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    pub fn cache_ttl_hours(&self) -> u64 {
        self.cache_ttl_hours.unwrap_or(DEFAULT_CACHE_TTL_HOURS)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.unwrap_or(DEFAULT_TICK_INTERVAL_MS))
    }

    /// The configured fallback method; validation guarantees it is known.
    pub fn default_method(&self) -> CalculationMethod {
        self.default_method
            .and_then(CalculationMethod::new)
            .unwrap_or_default()
    }

    /// Print the effective settings.
    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");
        log_indented!("Place search: {}", self.geocode_url());
        log_indented!("Prayer timings: {}", self.timings_url());
        log_indented!("Request timeout: {}s", self.request_timeout_secs());
        log_indented!("Location cache: {}h", self.cache_ttl_hours());
        log_indented!("Search debounce: {}ms", self.debounce().as_millis());
        log_indented!("Refresh interval: {}ms", self.tick_interval().as_millis());
        log_indented!("Default method: {}", self.default_method());
    }
}

#[cfg(test)]
mod tests;
