//! Pure projections of a schedule onto an instant.
//!
//! Every function here is stateless. Times of day are placed on the calendar
//! day of `now` in `now`'s own zone, so the caller decides which zone the
//! schedule is read in.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike};

use crate::schedule::types::{Prayer, PrayerSchedule};

const SECONDS_PER_DAY: u32 = 86_400;

/// Longest DST gap we step across, in minutes.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Place a time of day on a date in `tz`.
///
/// Ambiguous local times (DST fall back) take the earlier instant. Nonexistent
/// local times (DST spring forward) resolve to the first valid instant after
/// the gap.
pub fn at_local<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
    let naive = date.and_time(time);
    if let Some(instant) = tz.from_local_datetime(&naive).earliest() {
        return instant;
    }

    let whole_minute = naive
        .with_second(0)
        .and_then(|n| n.with_nanosecond(0))
        .unwrap_or(naive);
    (1..=MAX_GAP_MINUTES)
        .find_map(|m| {
            tz.from_local_datetime(&(whole_minute + Duration::minutes(m)))
                .earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().expect("calendar date within chrono's range")
}

fn previous_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().expect("calendar date within chrono's range")
}

/// The upcoming prayer and how long until it.
#[derive(Debug, Clone, PartialEq)]
pub struct NextPrayer<Tz: TimeZone> {
    pub prayer: Prayer,
    pub at: DateTime<Tz>,
    pub remaining: Duration,
}

impl<Tz: TimeZone> NextPrayer<Tz> {
    /// Whole seconds until the prayer, never negative.
    pub fn remaining_seconds(&self) -> i64 {
        self.remaining.num_seconds().max(0)
    }
}

/// One half-open interval `[start, end)` owned by a prayer.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveInterval<Tz: TimeZone> {
    pub prayer: Prayer,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> ActiveInterval<Tz> {
    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

/// The next prayer strictly after `now`.
///
/// Each prayer is placed on today's date; those already passed move to
/// tomorrow. The closest one wins, first in canonical order on ties.
pub fn next_prayer<Tz: TimeZone>(schedule: &PrayerSchedule, now: &DateTime<Tz>) -> NextPrayer<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();

    Prayer::ALL
        .iter()
        .map(|&prayer| {
            let time = schedule.time_of(prayer);
            let mut at = at_local(&tz, today, time);
            if at <= *now {
                at = at_local(&tz, next_day(today), time);
            }
            let remaining = at.clone().signed_duration_since(now.clone());
            NextPrayer {
                prayer,
                at,
                remaining,
            }
        })
        .min_by_key(|next| next.remaining)
        .expect("schedule always holds five prayers")
}

/// End of the interval starting at `start` for `prayer`: the following prayer's
/// first occurrence after `start`.
fn interval_end<Tz: TimeZone>(
    schedule: &PrayerSchedule,
    prayer: Prayer,
    start: &DateTime<Tz>,
) -> DateTime<Tz> {
    let tz = start.timezone();
    let following = schedule.time_of(prayer.next());
    let date = start.date_naive();
    let end = at_local(&tz, date, following);
    if end <= *start {
        at_local(&tz, next_day(date), following)
    } else {
        end
    }
}

/// The prayer whose interval contains `now`.
///
/// Intervals run from each prayer to the next in canonical order; Isha's
/// interval wraps to the following day's Fajr, so an instant before Fajr
/// belongs to the previous evening's Isha.
pub fn active_interval<Tz: TimeZone>(
    schedule: &PrayerSchedule,
    now: &DateTime<Tz>,
) -> ActiveInterval<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();

    let (prayer, start) = Prayer::ALL
        .iter()
        .map(|&prayer| {
            let time = schedule.time_of(prayer);
            let mut start = at_local(&tz, today, time);
            if start > *now {
                start = at_local(&tz, previous_day(today), time);
            }
            (prayer, start)
        })
        .max_by(|(_, a), (_, b)| a.cmp(b))
        .expect("schedule always holds five prayers");

    let end = interval_end(schedule, prayer, &start);
    ActiveInterval { prayer, start, end }
}

/// The five intervals of one day, starting at that day's Fajr.
///
/// Contiguous and non-overlapping; they span 24 hours unless `tz` changes
/// offset that day.
pub fn day_intervals<Tz: TimeZone>(
    schedule: &PrayerSchedule,
    tz: &Tz,
    date: NaiveDate,
) -> Vec<ActiveInterval<Tz>> {
    let mut intervals = Vec::with_capacity(Prayer::ALL.len());
    let mut start = at_local(tz, date, schedule.time_of(Prayer::Fajr));

    for prayer in Prayer::ALL {
        let end = interval_end(schedule, prayer, &start);
        intervals.push(ActiveInterval {
            prayer,
            start,
            end: end.clone(),
        });
        start = end;
    }
    intervals
}

fn seconds_of_day(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight()
}

/// Start of the last third of the night between Maghrib and Fajr.
///
/// Fajr is taken on the next day when its time of day is not after Maghrib's.
/// Result is floored to the second.
pub fn last_third_of_night(schedule: &PrayerSchedule) -> NaiveTime {
    let maghrib = seconds_of_day(schedule.time_of(Prayer::Maghrib));
    let mut fajr = seconds_of_day(schedule.time_of(Prayer::Fajr));
    if fajr <= maghrib {
        fajr += SECONDS_PER_DAY;
    }

    let night = fajr - maghrib;
    let start = (maghrib + night * 2 / 3) % SECONDS_PER_DAY;
    NaiveTime::from_num_seconds_from_midnight_opt(start, 0)
        .expect("seconds reduced modulo one day")
}

/// Everything the countdown view needs about one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockState<Tz: TimeZone> {
    pub next: NextPrayer<Tz>,
    pub active: ActiveInterval<Tz>,
    pub last_third: NaiveTime,
}

impl<Tz: TimeZone> ClockState<Tz> {
    pub fn evaluate(schedule: &PrayerSchedule, now: &DateTime<Tz>) -> Self {
        Self {
            next: next_prayer(schedule, now),
            active: active_interval(schedule, now),
            last_third: last_third_of_night(schedule),
        }
    }

    pub fn seconds_until_next(&self) -> i64 {
        self.next.remaining_seconds()
    }
}
