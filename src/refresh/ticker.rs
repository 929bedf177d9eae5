//! Per-tick work for the countdown and the wall clock.
//!
//! Both types are synchronous state machines driven by a tick; the scheduler
//! owns the timers. That keeps the rollover rules testable with a manual clock.

use chrono::{DateTime, Local};
use chrono_tz::Tz;
use std::sync::Arc;

use crate::schedule::clock::{NextPrayer, active_interval, next_prayer};
use crate::schedule::format::{format_clock, format_countdown};
use crate::schedule::types::{Prayer, PrayerSchedule};
use crate::session::view::UiUpdate;

fn minute_index(now: &DateTime<Local>) -> i64 {
    now.timestamp().div_euclid(60)
}

/// Countdown to the next prayer, with rollover when it arrives.
pub struct CountdownTicker {
    schedule: Arc<PrayerSchedule>,
    target: NextPrayer<Local>,
    active: Prayer,
    last_minute: i64,
}

impl CountdownTicker {
    pub fn new(schedule: Arc<PrayerSchedule>, now: DateTime<Local>) -> Self {
        let target = next_prayer(&schedule, &now);
        let active = active_interval(&schedule, &now).prayer;
        Self {
            schedule,
            target,
            active,
            last_minute: minute_index(&now),
        }
    }

    pub fn target(&self) -> Prayer {
        self.target.prayer
    }

    pub fn active(&self) -> Prayer {
        self.active
    }

    fn refresh_active(&mut self, now: &DateTime<Local>, updates: &mut Vec<UiUpdate>) {
        let active = active_interval(&self.schedule, now).prayer;
        if active != self.active {
            log_debug!("Active prayer changed: {} -> {}", self.active, active);
            self.active = active;
            updates.push(UiUpdate::ActivePrayer(active));
        }
    }

    /// Advance to `now`, returning the updates to publish.
    pub fn tick(&mut self, now: DateTime<Local>) -> Vec<UiUpdate> {
        let mut updates = Vec::new();

        let mut remaining = self.target.at - now;
        if remaining <= chrono::Duration::zero() {
            self.target = next_prayer(&self.schedule, &now);
            remaining = self.target.at - now;
            log_debug!("Countdown rolled over to {}", self.target.prayer);
            self.refresh_active(&now, &mut updates);
        }

        let minute = minute_index(&now);
        if minute != self.last_minute {
            self.last_minute = minute;
            self.refresh_active(&now, &mut updates);
        }

        let seconds = remaining.num_seconds().max(0);
        updates.push(UiUpdate::Countdown {
            prayer: self.target.prayer,
            remaining: format_countdown(seconds),
            seconds,
        });
        updates
    }
}

/// Renders the wall clock in the schedule's zone, or device-local time.
pub struct ClockRenderer {
    zone: Option<Tz>,
}

impl ClockRenderer {
    /// An unusable schedule timezone is logged here, once, and the renderer
    /// falls back to device-local time.
    pub fn new(schedule: Option<&PrayerSchedule>) -> Self {
        let zone = schedule.and_then(|s| match s.tz() {
            Ok(zone) => Some(zone),
            Err(e) => {
                log_warning!("{e}; showing device time instead");
                None
            }
        });
        Self { zone }
    }

    pub fn zone(&self) -> Option<Tz> {
        self.zone
    }

    pub fn render(&self, now: DateTime<Local>) -> String {
        match self.zone {
            Some(zone) => format_clock(&now.with_timezone(&zone)),
            None => format_clock(&now),
        }
    }
}
