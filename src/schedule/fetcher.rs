//! Prayer timings service client and schedule canonicalization.
//!
//! The request date is always the caller's local calendar date, even when the
//! coordinates lie in another timezone. The timings service answers for that
//! date at the given location.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::constants::{CONNECT_TIMEOUT_SECS, TIMINGS_SUCCESS_CODE};
use crate::error::PrayerError;
use crate::schedule::method::CalculationMethod;
use crate::schedule::types::{HijriDate, Prayer, PrayerSchedule};
use crate::time_source::TimeSource;

static TIME_OF_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{1,2}):(\d{2})(?:\s.*)?$").expect("valid time regex"));

/// Where the timings are wanted.
#[derive(Debug, Clone, PartialEq)]
pub enum TimingsTarget {
    Coordinates { latitude: f64, longitude: f64 },
    City(String),
}

/// One timings request.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingsRequest {
    /// `D-M-YYYY`, unpadded.
    pub date: String,
    pub target: TimingsTarget,
    pub method: CalculationMethod,
}

/// Response envelope of the timings service.
#[derive(Debug, Clone, Deserialize)]
pub struct TimingsEnvelope {
    pub code: Option<u16>,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TimingsData {
    timings: Option<HashMap<String, serde_json::Value>>,
    meta: Option<Meta>,
    date: Option<DateInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Meta {
    timezone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DateInfo {
    hijri: Option<RawHijri>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHijri {
    day: Option<serde_json::Value>,
    month: Option<RawHijriMonth>,
    year: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHijriMonth {
    en: Option<String>,
}

/// Prayer timings service.
pub trait TimingsService {
    fn timings(
        &self,
        request: &TimingsRequest,
    ) -> impl Future<Output = Result<TimingsEnvelope, PrayerError>>;
}

/// HTTP client for the Aladhan timings API.
pub struct AladhanClient {
    client: Client,
    base_url: String,
}

impl AladhanClient {
    /// # Errors
    ///
    /// Returns [`PrayerError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, user_agent: &str, timeout_secs: u64) -> Result<Self, PrayerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn request_url(&self, request: &TimingsRequest) -> String {
        match request.target {
            TimingsTarget::Coordinates { .. } => {
                format!("{}/timings/{}", self.base_url, request.date)
            }
            TimingsTarget::City(_) => format!("{}/timingsByCity/{}", self.base_url, request.date),
        }
    }
}

impl TimingsService for AladhanClient {
    async fn timings(&self, request: &TimingsRequest) -> Result<TimingsEnvelope, PrayerError> {
        let url = self.request_url(request);
        let method = request.method.id().to_string();
        let query: Vec<(&str, String)> = match &request.target {
            TimingsTarget::Coordinates {
                latitude,
                longitude,
            } => vec![
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("method", method),
            ],
            TimingsTarget::City(city) => vec![
                ("city", city.clone()),
                ("country", String::new()),
                ("method", method),
            ],
        };
        log_debug!("Timings request: {} {:?}", url, query);

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PrayerError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| PrayerError::Deserialize {
            context: "prayer timings".to_string(),
            source,
        })
    }
}

/// Format a date the way the timings service paths expect: `D-M-YYYY`.
pub fn request_date(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.day(), date.month(), date.year())
}

/// Parse a 24-hour `HH:MM` value, tolerating a trailing annotation like `(BST)`.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let captures = TIME_OF_DAY.captures(value)?;
    let hour: u32 = captures[1].parse().ok()?;
    let minute: u32 = captures[2].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Validate a response envelope and turn it into a schedule.
///
/// # Errors
///
/// [`PrayerError::MalformedPayload`] when the status code is not the success
/// sentinel or any required field is missing or unparseable.
pub fn canonicalize(
    envelope: TimingsEnvelope,
    location_label: Option<String>,
) -> Result<PrayerSchedule, PrayerError> {
    const CONTEXT: &str = "prayer timings";

    match envelope.code {
        Some(TIMINGS_SUCCESS_CODE) => {}
        Some(code) => {
            return Err(PrayerError::malformed(
                CONTEXT,
                format!("status code {code}"),
            ));
        }
        None => return Err(PrayerError::malformed(CONTEXT, "missing status code")),
    }

    let data: TimingsData =
        serde_json::from_value(envelope.data).map_err(|source| PrayerError::Deserialize {
            context: CONTEXT.to_string(),
            source,
        })?;

    let timings = data
        .timings
        .ok_or_else(|| PrayerError::malformed(CONTEXT, "missing timings"))?;
    let mut times = [NaiveTime::MIN; 5];
    for prayer in Prayer::ALL {
        let raw = timings
            .get(prayer.name())
            .and_then(|v| v.as_str())
            .ok_or_else(|| PrayerError::malformed(CONTEXT, format!("missing {prayer} time")))?;
        times[prayer.index()] = parse_time_of_day(raw).ok_or_else(|| {
            PrayerError::malformed(CONTEXT, format!("{prayer} time '{raw}' is not HH:MM"))
        })?;
    }

    let timezone = data
        .meta
        .and_then(|m| m.timezone)
        .filter(|tz| !tz.trim().is_empty())
        .ok_or_else(|| PrayerError::malformed(CONTEXT, "missing timezone"))?;

    let hijri = data
        .date
        .and_then(|d| d.hijri)
        .ok_or_else(|| PrayerError::malformed(CONTEXT, "missing hijri date"))?;
    let hijri = HijriDate {
        day: hijri
            .day
            .as_ref()
            .and_then(scalar_to_string)
            .ok_or_else(|| PrayerError::malformed(CONTEXT, "missing hijri day"))?,
        month: hijri
            .month
            .and_then(|m| m.en)
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| PrayerError::malformed(CONTEXT, "missing hijri month"))?,
        year: hijri
            .year
            .as_ref()
            .and_then(scalar_to_string)
            .ok_or_else(|| PrayerError::malformed(CONTEXT, "missing hijri year"))?,
    };

    Ok(PrayerSchedule::new(times, timezone, hijri, location_label))
}

/// Fetches one day's schedule from a [`TimingsService`].
pub struct ScheduleFetcher<T> {
    service: T,
    clock: Arc<dyn TimeSource>,
}

impl<T: TimingsService> ScheduleFetcher<T> {
    pub fn new(service: T, clock: Arc<dyn TimeSource>) -> Self {
        Self { service, clock }
    }

    fn today(&self) -> String {
        request_date(self.clock.now().date_naive())
    }

    /// Schedule for coordinates, labelled with the given location name.
    pub async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
        method: CalculationMethod,
        location_label: Option<String>,
    ) -> Result<PrayerSchedule, PrayerError> {
        let request = TimingsRequest {
            date: self.today(),
            target: TimingsTarget::Coordinates {
                latitude,
                longitude,
            },
            method,
        };
        let envelope = self.service.timings(&request).await?;
        canonicalize(envelope, location_label)
    }

    /// Schedule for a bare city name, resolved by the timings service itself.
    pub async fn fetch_by_city(
        &self,
        city: &str,
        method: CalculationMethod,
    ) -> Result<PrayerSchedule, PrayerError> {
        let request = TimingsRequest {
            date: self.today(),
            target: TimingsTarget::City(city.trim().to_string()),
            method,
        };
        let envelope = self.service.timings(&request).await?;
        canonicalize(envelope, Some(city.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> TimingsEnvelope {
        serde_json::from_value(value).unwrap()
    }

    fn full_payload() -> serde_json::Value {
        json!({
            "code": 200,
            "status": "OK",
            "data": {
                "timings": {
                    "Fajr": "05:00", "Sunrise": "06:30", "Dhuhr": "12:15",
                    "Asr": "15:45", "Sunset": "18:28", "Maghrib": "18:30",
                    "Isha": "20:00 (GMT)", "Imsak": "04:50", "Midnight": "00:15"
                },
                "date": {
                    "readable": "15 Jan 2026",
                    "hijri": {"day": "25", "month": {"number": 7, "en": "Rajab"}, "year": "1447"}
                },
                "meta": {"timezone": "Europe/London", "method": {"id": 3}}
            }
        })
    }

    #[test]
    fn test_request_date_is_unpadded() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(request_date(date), "5-3-2026");
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("05:07"), NaiveTime::from_hms_opt(5, 7, 0));
        assert_eq!(parse_time_of_day("5:07"), NaiveTime::from_hms_opt(5, 7, 0));
        assert_eq!(
            parse_time_of_day("20:00 (BST)"),
            NaiveTime::from_hms_opt(20, 0, 0)
        );
        assert_eq!(parse_time_of_day("24:00"), None);
        assert_eq!(parse_time_of_day("12:60"), None);
        assert_eq!(parse_time_of_day("noon"), None);
        assert_eq!(parse_time_of_day("12:00:30"), None);
    }

    #[test]
    fn test_canonicalize_full_payload() {
        let schedule = canonicalize(envelope(full_payload()), Some("London".into())).unwrap();
        let names: Vec<&str> = schedule
            .prayers()
            .iter()
            .map(|p| p.prayer.name())
            .collect();
        assert_eq!(names, ["Fajr", "Dhuhr", "Asr", "Maghrib", "Isha"]);
        assert_eq!(schedule.time_of(Prayer::Isha), NaiveTime::from_hms_opt(20, 0, 0).unwrap());
        assert_eq!(schedule.timezone, "Europe/London");
        assert_eq!(schedule.hijri.to_string(), "25 Rajab 1447 AH");
        assert_eq!(schedule.display_name(), "London");
    }

    #[test]
    fn test_canonicalize_rejects_bad_status() {
        let mut payload = full_payload();
        payload["code"] = json!(400);
        payload["data"] = json!("Invalid date or unable to parse it.");
        let err = canonicalize(envelope(payload), None).unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("status code 400"));
    }

    #[test]
    fn test_canonicalize_rejects_incomplete_payloads() {
        let mut missing_asr = full_payload();
        missing_asr["data"]["timings"]
            .as_object_mut()
            .unwrap()
            .remove("Asr");
        let err = canonicalize(envelope(missing_asr), None).unwrap_err();
        assert!(err.to_string().contains("missing Asr time"));

        let mut missing_tz = full_payload();
        missing_tz["data"]["meta"] = json!({});
        let err = canonicalize(envelope(missing_tz), None).unwrap_err();
        assert!(err.to_string().contains("missing timezone"));

        let mut missing_hijri = full_payload();
        missing_hijri["data"]["date"] = json!({"readable": "15 Jan 2026"});
        let err = canonicalize(envelope(missing_hijri), None).unwrap_err();
        assert!(err.to_string().contains("missing hijri date"));

        let mut bad_time = full_payload();
        bad_time["data"]["timings"]["Maghrib"] = json!("sunset");
        let err = canonicalize(envelope(bad_time), None).unwrap_err();
        assert!(err.to_string().contains("Maghrib time 'sunset'"));

        let no_code = json!({"data": {}});
        assert!(canonicalize(envelope(no_code), None).is_err());
    }
}
