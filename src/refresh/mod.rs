//! Periodic refresh: the wall clock, the countdown and input debouncing.
//!
//! ## Module Structure
//!
//! - [`task`]: one cancellable task slot per purpose
//! - [`ticker`]: countdown rollover and clock rendering, one tick at a time
//! - [`debounce`]: 300 ms quiet-period gate for interactive search
//!
//! The clock and countdown run as independent tokio tasks. Neither depends on
//! the other's timing, and neither touches the network.

pub mod debounce;
pub mod task;
pub mod ticker;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::MissedTickBehavior;

use crate::schedule::types::PrayerSchedule;
use crate::session::view::UiUpdate;
use crate::time_source::TimeSource;

pub use debounce::{Debouncer, InputOutcome};
pub use task::TaskSlot;
pub use ticker::{ClockRenderer, CountdownTicker};

/// Owns the clock and countdown tasks. Dropping it stops both.
pub struct RefreshScheduler {
    clock_task: TaskSlot,
    countdown_task: TaskSlot,
    tick: Duration,
    time: Arc<dyn TimeSource>,
    updates: UnboundedSender<UiUpdate>,
}

impl RefreshScheduler {
    pub fn new(
        tick: Duration,
        time: Arc<dyn TimeSource>,
        updates: UnboundedSender<UiUpdate>,
    ) -> Self {
        Self {
            clock_task: TaskSlot::new(),
            countdown_task: TaskSlot::new(),
            tick,
            time,
            updates,
        }
    }

    fn interval(tick: Duration) -> tokio::time::Interval {
        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    }

    /// (Re)start the wall clock, rendered in the schedule's zone when given.
    pub fn start_clock(&mut self, schedule: Option<Arc<PrayerSchedule>>) {
        let renderer = ClockRenderer::new(schedule.as_deref());
        let time = self.time.clone();
        let updates = self.updates.clone();
        let tick = self.tick;

        self.clock_task.replace(tokio::spawn(async move {
            let mut interval = Self::interval(tick);
            loop {
                interval.tick().await;
                if updates
                    .send(UiUpdate::Clock(renderer.render(time.now())))
                    .is_err()
                {
                    break;
                }
            }
        }));
    }

    /// (Re)start the countdown for a freshly loaded schedule.
    pub fn start_countdown(&mut self, schedule: Arc<PrayerSchedule>) {
        let time = self.time.clone();
        let updates = self.updates.clone();
        let tick = self.tick;
        let mut ticker = CountdownTicker::new(schedule, time.now());

        self.countdown_task.replace(tokio::spawn(async move {
            let mut interval = Self::interval(tick);
            loop {
                interval.tick().await;
                for update in ticker.tick(time.now()) {
                    if updates.send(update).is_err() {
                        return;
                    }
                }
            }
        }));
    }

    /// Restart both tasks for a new schedule.
    pub fn start(&mut self, schedule: Arc<PrayerSchedule>) {
        self.start_clock(Some(schedule.clone()));
        self.start_countdown(schedule);
    }

    pub fn stop(&mut self) {
        self.clock_task.cancel();
        self.countdown_task.cancel();
    }

    pub fn is_clock_running(&self) -> bool {
        self.clock_task.is_active()
    }

    pub fn is_countdown_running(&self) -> bool {
        self.countdown_task.is_active()
    }
}
