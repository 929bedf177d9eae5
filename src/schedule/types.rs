//! The five daily prayers and one day's schedule of them.

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PrayerError;

/// The five daily prayers, in canonical order.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    /// All prayers in canonical order.
    pub const ALL: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    /// Field name used by the timings service.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fajr => "Fajr",
            Self::Dhuhr => "Dhuhr",
            Self::Asr => "Asr",
            Self::Maghrib => "Maghrib",
            Self::Isha => "Isha",
        }
    }

    /// Position in the canonical order.
    pub fn index(&self) -> usize {
        match self {
            Self::Fajr => 0,
            Self::Dhuhr => 1,
            Self::Asr => 2,
            Self::Maghrib => 3,
            Self::Isha => 4,
        }
    }

    /// The prayer that follows this one; Isha wraps to Fajr.
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One prayer and its time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrayerTime {
    pub prayer: Prayer,
    pub time: NaiveTime,
}

/// Hijri calendar date, carried verbatim from the timings service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HijriDate {
    pub day: String,
    pub month: String,
    pub year: String,
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} AH", self.day, self.month, self.year)
    }
}

/// One day's prayer schedule. Replaced wholesale, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerSchedule {
    prayers: [PrayerTime; 5],
    pub timezone: String,
    pub hijri: HijriDate,
    pub location_label: Option<String>,
}

impl PrayerSchedule {
    /// Build a schedule from the five times in canonical order.
    pub fn new(
        times: [NaiveTime; 5],
        timezone: impl Into<String>,
        hijri: HijriDate,
        location_label: Option<String>,
    ) -> Self {
        let prayers = [0, 1, 2, 3, 4].map(|i| PrayerTime {
            prayer: Prayer::ALL[i],
            time: times[i],
        });
        Self {
            prayers,
            timezone: timezone.into(),
            hijri,
            location_label,
        }
    }

    /// All five entries in canonical order.
    pub fn prayers(&self) -> &[PrayerTime; 5] {
        &self.prayers
    }

    pub fn time_of(&self, prayer: Prayer) -> NaiveTime {
        self.prayers[prayer.index()].time
    }

    /// The schedule's timezone, parsed.
    pub fn tz(&self) -> Result<Tz, PrayerError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| PrayerError::InvalidTimezone {
                timezone: self.timezone.clone(),
            })
    }

    /// Title for the location: the source label, else the city part of the timezone.
    pub fn display_name(&self) -> String {
        if let Some(label) = self
            .location_label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
        {
            return label.to_string();
        }
        self.timezone
            .rsplit('/')
            .next()
            .unwrap_or(&self.timezone)
            .replace('_', " ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn sample(label: Option<&str>, timezone: &str) -> PrayerSchedule {
        PrayerSchedule::new(
            [t("05:00"), t("12:15"), t("15:45"), t("18:30"), t("20:00")],
            timezone,
            HijriDate {
                day: "25".into(),
                month: "Rajab".into(),
                year: "1447".into(),
            },
            label.map(str::to_string),
        )
    }

    #[test]
    fn test_canonical_order() {
        let schedule = sample(None, "Europe/London");
        let order: Vec<Prayer> = schedule.prayers().iter().map(|p| p.prayer).collect();
        assert_eq!(order, Prayer::ALL.to_vec());
        assert_eq!(schedule.time_of(Prayer::Asr), t("15:45"));
        assert_eq!(Prayer::Isha.next(), Prayer::Fajr);
        assert_eq!(Prayer::Fajr.next(), Prayer::Dhuhr);
    }

    #[test]
    fn test_display_name_falls_back_to_timezone_city() {
        assert_eq!(
            sample(None, "America/Argentina/Buenos_Aires").display_name(),
            "Buenos Aires"
        );
        assert_eq!(sample(Some("Leeds"), "Europe/London").display_name(), "Leeds");
        assert_eq!(sample(Some("  "), "UTC").display_name(), "UTC");
    }

    #[test]
    fn test_timezone_parsing() {
        assert!(sample(None, "Asia/Riyadh").tz().is_ok());
        let err = sample(None, "Mars/Olympus_Mons").tz().unwrap_err();
        assert!(matches!(err, PrayerError::InvalidTimezone { .. }));
    }

    #[test]
    fn test_hijri_display() {
        assert_eq!(sample(None, "UTC").hijri.to_string(), "25 Rajab 1447 AH");
    }
}
