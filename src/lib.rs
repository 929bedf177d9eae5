//! # Waqt Library
//!
//! Internal library for the waqt binary: daily prayer times for a city or a
//! position, with a live clock and a countdown to the next prayer.
//!
//! This library exists to enable testing of the internals and to keep CLI
//! dispatch (main.rs) separate from application logic.
//!
//! ## Architecture
//!
//! - **Place resolution**: `geo` ranks geocoder hits and resolves free text to
//!   coordinates with a 24 hour cache
//! - **Schedules**: `schedule` fetches the day's timings and projects them onto
//!   the clock (next prayer, active interval, last third of the night)
//! - **Refresh**: `refresh` owns the periodic clock and countdown tasks and the
//!   search debouncer
//! - **Orchestration**: `session` turns user intents into `UiUpdate`s
//! - **Presentation**: `display` draws updates in the terminal
//! - **Infrastructure**: configuration, preferences, logging, errors, time source
//!   and the command-line layer

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod commands;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod geo;
pub mod preferences;
pub mod refresh;
pub mod schedule;
pub mod session;
pub mod time_source;

pub use error::{ErrorKind, PrayerError};
pub use session::{Session, UiUpdate};
