//! Configuration validation functionality.

use anyhow::Result;

use super::Config;
use crate::constants::*;
use crate::schedule::method::CalculationMethod;

fn validate_range(value: u64, min: u64, max: u64, field: &str, unit: &str) -> Result<()> {
    if !(min..=max).contains(&value) {
        anyhow::bail!("{field} ({value} {unit}) must be between {min} and {max} {unit}");
    }
    Ok(())
}

fn validate_url(url: &str, field: &str) -> Result<()> {
    let trimmed = url.trim();
    let Some(rest) = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
    else {
        anyhow::bail!("{field} must be an http:// or https:// URL (got \"{url}\")");
    };
    if rest.trim_matches('/').is_empty() {
        anyhow::bail!("{field} is missing a host (got \"{url}\")");
    }
    Ok(())
}

/// Check every present field against its allowed range.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(url) = &config.geocode_url {
        validate_url(url, "geocode_url")?;
    }
    if let Some(url) = &config.timings_url {
        validate_url(url, "timings_url")?;
    }

    if let Some(agent) = &config.user_agent
        && agent.trim().is_empty()
    {
        anyhow::bail!("user_agent cannot be empty; the place search service rejects anonymous requests");
    }

    if let Some(secs) = config.request_timeout_secs {
        validate_range(
            secs,
            MINIMUM_REQUEST_TIMEOUT_SECS,
            MAXIMUM_REQUEST_TIMEOUT_SECS,
            "request_timeout_secs",
            "seconds",
        )?;
    }
    if let Some(hours) = config.cache_ttl_hours {
        validate_range(
            hours,
            MINIMUM_CACHE_TTL_HOURS,
            MAXIMUM_CACHE_TTL_HOURS,
            "cache_ttl_hours",
            "hours",
        )?;
    }
    if let Some(ms) = config.debounce_ms {
        validate_range(ms, MINIMUM_DEBOUNCE_MS, MAXIMUM_DEBOUNCE_MS, "debounce_ms", "ms")?;
    }
    if let Some(ms) = config.tick_interval_ms {
        validate_range(
            ms,
            MINIMUM_TICK_INTERVAL_MS,
            MAXIMUM_TICK_INTERVAL_MS,
            "tick_interval_ms",
            "ms",
        )?;
    }

    if let Some(id) = config.default_method
        && !CalculationMethod::is_valid_id(id)
    {
        anyhow::bail!(
            "default_method ({id}) is not a known calculation method (0-{MAXIMUM_CALCULATION_METHOD}, 6 is unassigned)"
        );
    }

    Ok(())
}
