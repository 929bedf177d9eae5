//! Values pushed from the session and refresh tasks to the presenter.

use chrono::{Local, NaiveTime};
use serde::Serialize;

use crate::geo::GeoCandidate;
use crate::schedule::clock::ClockState;
use crate::schedule::format::{format_12h, format_countdown};
use crate::schedule::method::CalculationMethod;
use crate::schedule::types::{Prayer, PrayerSchedule};

/// One presenter update.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Wall clock text, `HH:MM:SS`.
    Clock(String),
    Countdown {
        prayer: Prayer,
        remaining: String,
        seconds: i64,
    },
    ActivePrayer(Prayer),
    Schedule(Box<ScheduleView>),
    Suggestions(Vec<GeoCandidate>),
    SuggestionsCleared,
    Loading(bool),
    /// A single user-facing failure message.
    Error(String),
    MethodChanged(CalculationMethod),
}

/// One row of the schedule table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub prayer: Prayer,
    /// 24-hour `HH:MM`.
    pub time: String,
    /// 12-hour `h:MM AM/PM`.
    pub display_time: String,
    pub active: bool,
}

/// Everything needed to draw a freshly fetched schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleView {
    pub location: String,
    pub timezone: String,
    pub hijri_date: String,
    pub method: CalculationMethod,
    pub method_name: String,
    pub rows: Vec<ScheduleRow>,
    pub next_prayer: Prayer,
    pub countdown: String,
    pub seconds_until_next: i64,
    pub last_third: String,
}

fn hh_mm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

impl ScheduleView {
    pub fn build(
        schedule: &PrayerSchedule,
        method: CalculationMethod,
        state: &ClockState<Local>,
    ) -> Self {
        let rows = schedule
            .prayers()
            .iter()
            .map(|entry| ScheduleRow {
                prayer: entry.prayer,
                time: hh_mm(entry.time),
                display_time: format_12h(entry.time),
                active: entry.prayer == state.active.prayer,
            })
            .collect();

        Self {
            location: schedule.display_name(),
            timezone: schedule.timezone.clone(),
            hijri_date: schedule.hijri.to_string(),
            method,
            method_name: method.name().to_string(),
            rows,
            next_prayer: state.next.prayer,
            countdown: format_countdown(state.seconds_until_next()),
            seconds_until_next: state.seconds_until_next(),
            last_third: format_12h(state.last_third),
        }
    }

    pub fn active_prayer(&self) -> Option<Prayer> {
        self.rows.iter().find(|r| r.active).map(|r| r.prayer)
    }
}
