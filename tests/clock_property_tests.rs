use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use proptest::prelude::*;
use waqt::schedule::clock::{
    active_interval, day_intervals, last_third_of_night, next_prayer,
};
use waqt::schedule::types::{HijriDate, Prayer, PrayerSchedule};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 10).unwrap()
}

fn schedule_from_minutes(minutes: &[u32]) -> PrayerSchedule {
    let times: Vec<NaiveTime> = minutes
        .iter()
        .map(|m| NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap())
        .collect();
    PrayerSchedule::new(
        [times[0], times[1], times[2], times[3], times[4]],
        "UTC",
        HijriDate {
            day: "24".into(),
            month: "Dhū al-Ḥijjah".into(),
            year: "1447".into(),
        },
        None,
    )
}

/// Five distinct, ascending minutes of the day.
fn schedule_strategy() -> impl Strategy<Value = PrayerSchedule> {
    prop::collection::btree_set(0u32..1440, 5).prop_map(|set| {
        let minutes: Vec<u32> = set.into_iter().collect();
        schedule_from_minutes(&minutes)
    })
}

fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..86_400).prop_map(|offset| {
        Utc.from_utc_datetime(&date().and_hms_opt(0, 0, 0).unwrap()) + Duration::seconds(offset)
    })
}

#[cfg(test)]
mod partition_tests {
    use super::*;

    proptest! {
        /// The five intervals are contiguous, non-empty and cover exactly one day
        #[test]
        fn test_intervals_partition_the_day(schedule in schedule_strategy()) {
            let intervals = day_intervals(&schedule, &Utc, date());

            prop_assert_eq!(intervals.len(), 5);
            for (interval, prayer) in intervals.iter().zip(Prayer::ALL) {
                prop_assert_eq!(interval.prayer, prayer);
                prop_assert!(interval.start < interval.end);
            }
            for pair in intervals.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            prop_assert_eq!(intervals[4].end - intervals[0].start, Duration::hours(24));
        }

        /// Every instant belongs to exactly one interval, which ends at the next prayer
        #[test]
        fn test_active_interval_contains_now(
            schedule in schedule_strategy(),
            now in instant_strategy()
        ) {
            let active = active_interval(&schedule, &now);
            let next = next_prayer(&schedule, &now);

            prop_assert!(active.contains(&now));
            prop_assert_eq!(active.end, next.at);
            prop_assert_eq!(active.prayer.next(), next.prayer);

            // The neighbouring intervals of the partition do not contain it
            let today = day_intervals(&schedule, &Utc, date());
            let yesterday = day_intervals(&schedule, &Utc, date().pred_opt().unwrap());
            let owners = today
                .iter()
                .chain(yesterday.iter())
                .filter(|interval| interval.contains(&now))
                .count();
            prop_assert_eq!(owners, 1);
        }
    }
}

#[cfg(test)]
mod next_prayer_tests {
    use super::*;

    proptest! {
        /// The next prayer is one of the five and strictly in the future
        #[test]
        fn test_next_prayer_is_in_the_future(
            schedule in schedule_strategy(),
            now in instant_strategy()
        ) {
            let next = next_prayer(&schedule, &now);

            prop_assert!(next.at > now);
            prop_assert!(next.remaining > Duration::zero());
            prop_assert!(next.remaining <= Duration::hours(24));
            prop_assert_eq!(next.at.time(), schedule.time_of(next.prayer));

            // No prayer falls strictly between now and the chosen one
            for prayer in Prayer::ALL {
                let time = schedule.time_of(prayer);
                for day in [date(), date().succ_opt().unwrap()] {
                    let at = Utc.from_utc_datetime(&day.and_time(time));
                    prop_assert!(!(at > now && at < next.at));
                }
            }
        }
    }
}

#[cfg(test)]
mod last_third_tests {
    use super::*;

    proptest! {
        /// The last third starts two thirds of the way from Maghrib to the next Fajr
        #[test]
        fn test_last_third_is_exact(schedule in schedule_strategy()) {
            let maghrib = Utc.from_utc_datetime(&date().and_time(schedule.time_of(Prayer::Maghrib)));
            let fajr = Utc.from_utc_datetime(
                &date().succ_opt().unwrap().and_time(schedule.time_of(Prayer::Fajr)),
            );
            let night = fajr - maghrib;
            let expected = maghrib + night * 2 / 3;

            let last_third = last_third_of_night(&schedule);

            prop_assert_eq!(last_third, expected.time().with_nanosecond(0).unwrap());

            let start = Utc.from_utc_datetime(&expected.date_naive().and_time(last_third));
            prop_assert!(start > maghrib);
            prop_assert!(start < fajr);
        }
    }
}
