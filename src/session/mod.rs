//! Orchestration of user intents into resolve, fetch and refresh runs.
//!
//! The [`Session`] owns the only mutable state of a run: the current schedule,
//! the current suggestions and the calculation method. Every intent ends in
//! [`UiUpdate`]s on the channel handed in at construction. Failures never
//! escape: they are logged and surfaced as one [`UiUpdate::Error`], and the
//! running clock keeps ticking.
//!
//! Network calls are never cancelled. When two requests overlap the response
//! that completes last wins, whichever was issued first.

pub mod view;

use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::config::Config;
use crate::error::PrayerError;
use crate::geo::resolver::LocationResolver;
use crate::geo::search::PlaceSearch;
use crate::geo::types::GeoCandidate;
use crate::preferences::PreferenceStore;
use crate::refresh::{Debouncer, InputOutcome, RefreshScheduler};
use crate::schedule::clock::ClockState;
use crate::schedule::fetcher::{ScheduleFetcher, TimingsService};
use crate::schedule::method::CalculationMethod;
use crate::schedule::types::PrayerSchedule;
use crate::time_source::TimeSource;

pub use view::{ScheduleRow, ScheduleView, UiUpdate};

const EMPTY_QUERY_MESSAGE: &str = "Please enter a city name";
const SEARCH_FAILED_MESSAGE: &str = "Search failed";
const UNKNOWN_METHOD_MESSAGE: &str = "Unknown calculation method";
const DEVICE_FETCH_FAILED_MESSAGE: &str = "Failed to fetch prayer times for your location";

/// What the current schedule was loaded for, so a method change can reload it.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationRequest {
    Query(String),
    Coordinates {
        latitude: f64,
        longitude: f64,
        label: Option<String>,
    },
}

/// Mutable state of one session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub schedule: Option<Arc<PrayerSchedule>>,
    pub suggestions: Vec<GeoCandidate>,
    pub method: CalculationMethod,
    pub last_request: Option<LocationRequest>,
}

/// Drives the resolve → fetch → refresh pipeline for one user.
pub struct Session<S, T, P> {
    resolver: LocationResolver<S>,
    fetcher: ScheduleFetcher<T>,
    preferences: P,
    state: SessionState,
    scheduler: RefreshScheduler,
    debouncer: Debouncer,
    clock: Arc<dyn TimeSource>,
    updates: UnboundedSender<UiUpdate>,
}

impl<S, T, P> Session<S, T, P>
where
    S: PlaceSearch,
    T: TimingsService,
    P: PreferenceStore,
{
    /// Build a session. The returned receiver yields debounced search text,
    /// which the caller feeds back through [`Session::run_suggestions`].
    pub fn new(
        search: S,
        timings: T,
        preferences: P,
        config: &Config,
        method: CalculationMethod,
        clock: Arc<dyn TimeSource>,
        updates: UnboundedSender<UiUpdate>,
    ) -> (Self, UnboundedReceiver<String>) {
        let (fired_tx, fired_rx) = unbounded_channel();
        let session = Self {
            resolver: LocationResolver::new(search, config.cache_ttl_hours(), clock.clone()),
            fetcher: ScheduleFetcher::new(timings, clock.clone()),
            preferences,
            state: SessionState {
                method,
                ..Default::default()
            },
            scheduler: RefreshScheduler::new(config.tick_interval(), clock.clone(), updates.clone()),
            debouncer: Debouncer::new(config.debounce(), fired_tx),
            clock,
            updates,
        };
        (session, fired_rx)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn schedule(&self) -> Option<&PrayerSchedule> {
        self.state.schedule.as_deref()
    }

    pub fn method(&self) -> CalculationMethod {
        self.state.method
    }

    pub fn resolver(&self) -> &LocationResolver<S> {
        &self.resolver
    }

    fn send(&self, update: UiUpdate) {
        // The presenter going away is not an error for the pipeline
        let _ = self.updates.send(update);
    }

    /// Start the wall clock in device-local time before any schedule exists.
    pub fn start(&mut self) {
        if !self.scheduler.is_clock_running() {
            self.scheduler.start_clock(None);
        }
    }

    /// Stop every periodic task and any pending search.
    pub fn shutdown(&mut self) {
        self.scheduler.stop();
        self.debouncer.cancel();
    }

    fn remember_city(&self, city: &str) {
        if let Err(e) = self.preferences.set_last_city(city) {
            log_warning!("Could not save last city: {e:#}");
        }
    }

    fn clear_suggestions(&mut self) {
        self.debouncer.cancel();
        self.state.suggestions.clear();
        self.send(UiUpdate::SuggestionsCleared);
    }

    fn report(&self, error: &PrayerError) {
        self.report_as(error, error.user_message());
    }

    fn report_as(&self, error: &PrayerError, message: &str) {
        log_error!("{error}");
        self.send(UiUpdate::Loading(false));
        self.send(UiUpdate::Error(message.to_string()));
    }

    fn apply(&mut self, schedule: PrayerSchedule) {
        let schedule = Arc::new(schedule);
        let now = self.clock.now();
        let clock_state = ClockState::evaluate(&schedule, &now);
        let view = ScheduleView::build(&schedule, self.state.method, &clock_state);

        log_block_start!(
            "Loaded prayer times for {} ({})",
            view.location,
            schedule.timezone
        );
        log_indented!("Next: {} in {}", view.next_prayer, view.countdown);

        self.state.schedule = Some(schedule.clone());
        self.send(UiUpdate::Loading(false));
        self.send(UiUpdate::Schedule(Box::new(view)));
        self.scheduler.start(schedule);
    }

    /// Full search for free text.
    ///
    /// A suggestion whose name matches the text exactly (ignoring case) is
    /// selected directly. Otherwise the text is geocoded; if geocoding fails
    /// for any reason the timings service is asked by city name instead.
    pub async fn resolve(&mut self, text: &str) {
        let query = text.trim();
        if query.is_empty() {
            self.send(UiUpdate::Error(EMPTY_QUERY_MESSAGE.to_string()));
            return;
        }

        let lowered = query.to_lowercase();
        if let Some(candidate) = self
            .state
            .suggestions
            .iter()
            .find(|s| s.name.to_lowercase() == lowered)
            .cloned()
        {
            self.select_candidate(candidate).await;
            return;
        }

        self.remember_city(query);
        self.state.last_request = Some(LocationRequest::Query(query.to_string()));
        self.send(UiUpdate::Loading(true));
        self.clear_suggestions();

        match self.load_query(query).await {
            Ok(schedule) => self.apply(schedule),
            Err(e) => self.report(&e),
        }
    }

    async fn load_query(&mut self, query: &str) -> Result<PrayerSchedule, PrayerError> {
        let method = self.state.method;
        match self.resolver.resolve(query).await {
            Ok(location) => {
                self.fetcher
                    .fetch_by_coordinates(
                        location.latitude,
                        location.longitude,
                        method,
                        Some(query.to_string()),
                    )
                    .await
            }
            Err(e) => {
                log_warning!("Geocoding failed ({e}), asking the timings service by city");
                self.fetcher.fetch_by_city(query, method).await
            }
        }
    }

    /// Schedule for the device's position.
    ///
    /// `position` is the outcome of asking the device; an error is reported as
    /// [`PrayerError::GeolocationDenied`].
    pub async fn resolve_current_location(&mut self, position: Result<(f64, f64), String>) {
        let (latitude, longitude) = match position {
            Ok((lat, lon)) if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) => {
                (lat, lon)
            }
            Ok((lat, lon)) => {
                self.report(&PrayerError::GeolocationDenied {
                    reason: format!("position ({lat}, {lon}) is out of range"),
                });
                return;
            }
            Err(reason) => {
                self.report(&PrayerError::GeolocationDenied { reason });
                return;
            }
        };

        self.load_coordinates(latitude, longitude, None).await;
    }

    async fn load_coordinates(&mut self, latitude: f64, longitude: f64, label: Option<String>) {
        self.state.last_request = Some(LocationRequest::Coordinates {
            latitude,
            longitude,
            label: label.clone(),
        });
        self.send(UiUpdate::Loading(true));

        // Unlabelled coordinates come from the device
        let from_device = label.is_none();
        let result = self
            .fetcher
            .fetch_by_coordinates(latitude, longitude, self.state.method, label)
            .await;
        match result {
            Ok(schedule) => self.apply(schedule),
            Err(e) if from_device => self.report_as(&e, DEVICE_FETCH_FAILED_MESSAGE),
            Err(e) => self.report(&e),
        }
    }

    /// Load the schedule for a suggestion the user picked.
    pub async fn select_candidate(&mut self, candidate: GeoCandidate) {
        self.remember_city(&candidate.name);
        self.clear_suggestions();
        self.load_coordinates(candidate.latitude, candidate.longitude, Some(candidate.name))
            .await;
    }

    /// Switch calculation method, persist it, and reload the current location.
    pub async fn change_method(&mut self, id: u8) {
        let Some(method) = CalculationMethod::new(id) else {
            log_warning!("Ignoring unknown calculation method {id}");
            self.send(UiUpdate::Error(UNKNOWN_METHOD_MESSAGE.to_string()));
            return;
        };

        self.state.method = method;
        if let Err(e) = self.preferences.set_calculation_method(method) {
            log_warning!("Could not save calculation method: {e:#}");
        }
        log_decorated!("Calculation method: {method}");
        self.send(UiUpdate::MethodChanged(method));

        match self.state.last_request.clone() {
            Some(LocationRequest::Query(query)) => {
                self.send(UiUpdate::Loading(true));
                match self.load_query(&query).await {
                    Ok(schedule) => self.apply(schedule),
                    Err(e) => self.report(&e),
                }
            }
            Some(LocationRequest::Coordinates {
                latitude,
                longitude,
                label,
            }) => self.load_coordinates(latitude, longitude, label).await,
            None => {}
        }
    }

    /// A keystroke in the search box.
    pub fn on_input(&mut self, text: &str) {
        if self.debouncer.input(text) == InputOutcome::Cleared {
            self.state.suggestions.clear();
            self.send(UiUpdate::SuggestionsCleared);
        }
    }

    /// Run a debounced suggestion search.
    pub async fn run_suggestions(&mut self, text: &str) {
        match self.resolver.suggest(text).await {
            Ok(candidates) => {
                log_debug!("{} suggestions for \"{}\"", candidates.len(), text.trim());
                self.state.suggestions = candidates.clone();
                self.send(UiUpdate::Suggestions(candidates));
            }
            Err(e) => {
                log_warning!("City search failed: {e}");
                self.send(UiUpdate::Error(SEARCH_FAILED_MESSAGE.to_string()));
            }
        }
    }
}
