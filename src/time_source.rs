//! Time source abstraction for supporting both real and simulated time.
//!
//! Every component that needs "now" (cache expiry, the request date, the clock
//! and countdown ticks) reads it through a [`TimeSource`]. The binary installs a
//! global source once at startup; library types receive an `Arc<dyn TimeSource>`
//! explicitly so tests can pin or advance time by hand.

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, TimeZone};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Simulated time that starts at a chosen instant and then advances in real time.
///
/// Used by `--at` so the live countdown and clock behave normally, just shifted
/// to another moment.
pub struct SimulatedTimeSource {
    start_time: DateTime<Local>,
    anchor: Instant,
}

impl SimulatedTimeSource {
    pub fn new(start_time: DateTime<Local>) -> Self {
        Self {
            start_time,
            anchor: Instant::now(),
        }
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Local> {
        let elapsed = ChronoDuration::from_std(self.anchor.elapsed()).unwrap_or_default();
        self.start_time + elapsed
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Manually driven time. Only moves when told to.
pub struct ManualTimeSource {
    current: Mutex<DateTime<Local>>,
}

impl ManualTimeSource {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, to: DateTime<Local>) {
        let mut guard = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *guard = to;
    }

    /// Move forward by the given duration.
    pub fn advance(&self, by: ChronoDuration) {
        let mut guard = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> DateTime<Local> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// Handle to the global time source, for components that take it explicitly.
pub fn shared() -> Arc<dyn TimeSource> {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .clone()
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Check if we're running in simulation mode
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS" as device-local time
pub fn parse_datetime(s: &str) -> Result<DateTime<Local>, String> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))
        .and_then(|naive| {
            Local
                .from_local_datetime(&naive)
                .earliest()
                .ok_or_else(|| "Nonexistent local time (daylight saving gap)".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_datetime() {
        let parsed = parse_datetime("2026-01-15 19:00:00").unwrap();
        assert_eq!(parsed.hour(), 19);
        assert_eq!(parsed.minute(), 0);

        assert!(parse_datetime("19:00").is_err());
        assert!(parse_datetime("2026-13-01 00:00:00").is_err());
    }

    #[test]
    fn test_manual_time_source_moves_only_when_told() {
        let start = parse_datetime("2026-01-15 04:00:00").unwrap();
        let source = ManualTimeSource::new(start);
        assert_eq!(source.now(), start);

        source.advance(ChronoDuration::minutes(90));
        assert_eq!(source.now().hour(), 5);
        assert_eq!(source.now().minute(), 30);

        source.set(start);
        assert_eq!(source.now(), start);
        assert!(source.is_simulated());
    }

    #[test]
    fn test_simulated_time_source_starts_at_given_instant() {
        let start = parse_datetime("2026-01-15 12:00:00").unwrap();
        let source = SimulatedTimeSource::new(start);
        let now = source.now();
        assert!(now >= start);
        assert!(now - start < ChronoDuration::seconds(5));
    }
}
