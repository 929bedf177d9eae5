//! Integration tests for the place search and prayer timings clients.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made.

use std::sync::Arc;

use chrono::{Duration, Local, TimeZone};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use waqt::error::{ErrorKind, PrayerError};
use waqt::geo::{LocationResolver, NominatimClient, PlaceSearch};
use waqt::schedule::fetcher::{AladhanClient, ScheduleFetcher};
use waqt::schedule::method::CalculationMethod;
use waqt::schedule::types::Prayer;
use waqt::time_source::ManualTimeSource;

const USER_AGENT: &str = "waqt-test/0.1";

fn clock() -> Arc<ManualTimeSource> {
    let noon = Local
        .with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
        .earliest()
        .expect("noon exists");
    Arc::new(ManualTimeSource::new(noon))
}

fn cairo_hit() -> serde_json::Value {
    json!({
        "name": "Cairo",
        "type": "city",
        "class": "place",
        "importance": 0.82,
        "lat": "30.0444",
        "lon": "31.2357",
        "display_name": "Cairo, Cairo Governorate, Egypt",
        "address": {"city": "Cairo", "state": "Cairo Governorate", "country": "Egypt"}
    })
}

fn timings_payload() -> serde_json::Value {
    json!({
        "code": 200,
        "status": "OK",
        "data": {
            "timings": {
                "Fajr": "05:21", "Sunrise": "06:50", "Dhuhr": "12:04",
                "Asr": "15:02", "Sunset": "17:18", "Maghrib": "17:18",
                "Isha": "18:38 (EET)", "Midnight": "23:59"
            },
            "date": {
                "readable": "15 Jan 2026",
                "hijri": {"day": "26", "month": {"en": "Rajab", "ar": "رَجَب"}, "year": "1447"}
            },
            "meta": {"timezone": "Africa/Cairo", "method": {"id": 5}}
        }
    })
}

// ---------------------------------------------------------------------------
// Place search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_sends_expected_query_and_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Cairo"))
        .and(query_param("format", "json"))
        .and(query_param("addressdetails", "1"))
        .and(query_param("limit", "15"))
        .and(query_param("accept-language", "en"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([cairo_hit()])))
        .expect(1)
        .mount(&server)
        .await;

    let client = NominatimClient::new(&server.uri(), USER_AGENT, 5).expect("client builds");
    let hits = client.search("Cairo", 15).await.expect("search succeeds");

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name.as_deref(), Some("Cairo"));
    assert_eq!(hits[0].coordinates(), Some((30.0444, 31.2357)));
}

#[tokio::test]
async fn search_maps_error_status_to_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = NominatimClient::new(&server.uri(), USER_AGENT, 5).expect("client builds");
    let err = client.search("Cairo", 5).await.unwrap_err();

    assert!(
        matches!(err, PrayerError::UnexpectedStatus { status: 503, .. }),
        "expected UnexpectedStatus(503), got: {err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::Upstream);
}

#[tokio::test]
async fn search_rejects_undecodable_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let client = NominatimClient::new(&server.uri(), USER_AGENT, 5).expect("client builds");
    let err = client.search("Cairo", 5).await.unwrap_err();

    assert!(err.is_upstream(), "expected an upstream error, got: {err:?}");
}

// ---------------------------------------------------------------------------
// Resolver cache
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolver_reuses_fresh_entries_and_refetches_stale_ones() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([cairo_hit()])))
        .expect(2)
        .mount(&server)
        .await;

    let clock = clock();
    let client = NominatimClient::new(&server.uri(), USER_AGENT, 5).expect("client builds");
    let mut resolver = LocationResolver::new(client, 24, clock.clone());

    let first = resolver.resolve("Cairo").await.expect("first resolve");
    let second = resolver.resolve("  cairo ").await.expect("cached resolve");
    assert_eq!(first, second);
    assert_eq!(first.city_name, "Cairo");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    clock.advance(Duration::hours(25));
    let third = resolver.resolve("Cairo").await.expect("stale resolve");
    assert_eq!(third.latitude, 30.0444);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Prayer timings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn timings_by_coordinates_uses_dated_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/timings/15-1-2026"))
        .and(query_param("latitude", "30.0444"))
        .and(query_param("longitude", "31.2357"))
        .and(query_param("method", "5"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(timings_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/v1", server.uri());
    let client = AladhanClient::new(&base, USER_AGENT, 5).expect("client builds");
    let fetcher = ScheduleFetcher::new(client, clock());
    let method = CalculationMethod::new(5).expect("known method");

    let schedule = fetcher
        .fetch_by_coordinates(30.0444, 31.2357, method, Some("Cairo".to_string()))
        .await
        .expect("fetch succeeds");

    assert_eq!(schedule.timezone, "Africa/Cairo");
    assert_eq!(schedule.display_name(), "Cairo");
    assert_eq!(schedule.hijri.to_string(), "26 Rajab 1447 AH");
    assert_eq!(schedule.time_of(Prayer::Fajr).to_string(), "05:21:00");
    assert_eq!(schedule.time_of(Prayer::Isha).to_string(), "18:38:00");
}

#[tokio::test]
async fn timings_by_city_uses_city_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/timingsByCity/15-1-2026"))
        .and(query_param("city", "Cairo"))
        .and(query_param("country", ""))
        .and(query_param("method", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(timings_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/v1/", server.uri());
    let client = AladhanClient::new(&base, USER_AGENT, 5).expect("client builds");
    let fetcher = ScheduleFetcher::new(client, clock());

    let schedule = fetcher
        .fetch_by_city(" Cairo ", CalculationMethod::default())
        .await
        .expect("fetch succeeds");

    assert_eq!(schedule.location_label.as_deref(), Some("Cairo"));
}

#[tokio::test]
async fn timings_with_failed_envelope_are_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/timings/15-1-2026"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 400,
            "status": "BAD_REQUEST",
            "data": "Please specify a valid latitude and longitude."
        })))
        .mount(&server)
        .await;

    let base = format!("{}/v1", server.uri());
    let client = AladhanClient::new(&base, USER_AGENT, 5).expect("client builds");
    let fetcher = ScheduleFetcher::new(client, clock());

    let err = fetcher
        .fetch_by_coordinates(0.0, 0.0, CalculationMethod::default(), None)
        .await
        .unwrap_err();

    assert!(
        matches!(err, PrayerError::MalformedPayload { ref reason, .. } if reason == "status code 400"),
        "expected MalformedPayload, got: {err:?}"
    );
    assert_eq!(
        err.user_message(),
        "Failed to fetch prayer times. Please try again."
    );
}

#[tokio::test]
async fn timings_http_error_is_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/timingsByCity/15-1-2026"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let base = format!("{}/v1", server.uri());
    let client = AladhanClient::new(&base, USER_AGENT, 5).expect("client builds");
    let fetcher = ScheduleFetcher::new(client, clock());

    let err = fetcher
        .fetch_by_city("Atlantis", CalculationMethod::default())
        .await
        .unwrap_err();

    assert!(matches!(err, PrayerError::UnexpectedStatus { status: 500, .. }));
}
