//! Daily prayer schedules: fetching, canonical form and clock projections.
//!
//! ## Module Structure
//!
//! - [`types`]: the five prayers, Hijri date and the canonical day schedule
//! - [`method`]: calculation method ids understood by the timings service
//! - [`fetcher`]: timings service contract, Aladhan client and payload validation
//! - [`clock`]: next prayer, active interval and last third of the night
//! - [`format`]: countdown, 12-hour and wall clock text

pub mod clock;
pub mod fetcher;
pub mod format;
pub mod method;
pub mod types;

pub use clock::{ActiveInterval, ClockState, NextPrayer, active_interval, next_prayer};
pub use fetcher::{AladhanClient, ScheduleFetcher, TimingsService};
pub use format::{format_12h, format_clock, format_countdown};
pub use method::CalculationMethod;
pub use types::{HijriDate, Prayer, PrayerSchedule, PrayerTime};
