//! Command-line command handlers for waqt.
//!
//! Each command lives in its own submodule. The helpers here build a live
//! [`Session`] from the configuration and resolve the per-run defaults (city,
//! calculation method) shared by the commands.

pub mod help;
pub mod interactive;
pub mod locate;
pub mod method;
pub mod search;
pub mod theme;
pub mod today;
pub mod watch;

use anyhow::{Context, Result};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use crate::args::{Command, GlobalOptions};
use crate::config::Config;
use crate::geo::search::NominatimClient;
use crate::preferences::PreferenceStore;
use crate::schedule::fetcher::AladhanClient;
use crate::schedule::method::CalculationMethod;
use crate::session::{ScheduleView, Session, UiUpdate};
use crate::time_source;

/// A session talking to the real services.
pub type LiveSession<P> = Session<NominatimClient, AladhanClient, P>;

/// Everything a command needs to drive a session.
pub struct SessionHandles<P> {
    pub session: LiveSession<P>,
    pub updates: UnboundedReceiver<UiUpdate>,
    /// Debounced search text, see [`Session::run_suggestions`].
    pub fired: UnboundedReceiver<String>,
}

/// Run a parsed command.
pub async fn dispatch(command: Command, options: &GlobalOptions) -> Result<()> {
    match command {
        Command::Today { city, json } => today::run_today(city, options.method, json).await,
        Command::Watch { city } => watch::run_watch(city, options.method).await,
        Command::Search { text } => search::run_search(&text).await,
        Command::Locate {
            latitude,
            longitude,
        } => locate::run_locate(latitude, longitude, options.method).await,
        Command::Method { id } => method::run_method_command(id),
        Command::Methods => method::run_methods_command(),
        Command::Interactive => interactive::run_interactive(options.method).await,
        Command::Theme { dark_mode } => theme::run_theme_command(dark_mode),
    }
}

/// Build the service clients and a session around them.
pub(crate) fn open_session<P: PreferenceStore>(
    config: &Config,
    preferences: P,
    method: CalculationMethod,
) -> Result<SessionHandles<P>> {
    let search = NominatimClient::new(
        config.geocode_url(),
        config.user_agent(),
        config.request_timeout_secs(),
    )
    .context("Failed to create the place search client")?;
    let timings = AladhanClient::new(
        config.timings_url(),
        config.user_agent(),
        config.request_timeout_secs(),
    )
    .context("Failed to create the prayer timings client")?;

    let (tx, updates) = unbounded_channel();
    let (session, fired) = Session::new(
        search,
        timings,
        preferences,
        config,
        method,
        time_source::shared(),
        tx,
    );
    Ok(SessionHandles {
        session,
        updates,
        fired,
    })
}

/// Method for this run: the `--method` override, then the saved preference,
/// then the configured default.
pub(crate) fn effective_method<P: PreferenceStore>(
    override_id: Option<u8>,
    preferences: &P,
    config: &Config,
) -> Result<CalculationMethod> {
    if let Some(id) = override_id {
        return CalculationMethod::new(id).with_context(|| {
            format!("Unknown calculation method {id} (run 'waqt methods' for the list)")
        });
    }
    Ok(preferences
        .calculation_method()?
        .unwrap_or_else(|| config.default_method()))
}

/// The city given on the command line, else the last one searched.
pub(crate) fn city_or_last<P: PreferenceStore>(
    city: Option<String>,
    preferences: &P,
) -> Result<String> {
    match city {
        Some(city) => Ok(city),
        None => preferences
            .last_city()?
            .context("No city given and none saved yet. Try 'waqt today <city>'"),
    }
}

/// Updates sent so far.
pub(crate) fn drain(updates: &mut UnboundedReceiver<UiUpdate>) -> Vec<UiUpdate> {
    let mut out = Vec::new();
    while let Ok(update) = updates.try_recv() {
        out.push(update);
    }
    out
}

/// The schedule a one-shot request produced, or its user-facing error.
pub(crate) fn schedule_or_error(updates: &[UiUpdate]) -> Result<&ScheduleView> {
    if let Some(view) = updates.iter().find_map(|u| match u {
        UiUpdate::Schedule(view) => Some(view.as_ref()),
        _ => None,
    }) {
        return Ok(view);
    }
    match updates.iter().find_map(|u| match u {
        UiUpdate::Error(message) => Some(message),
        _ => None,
    }) {
        Some(message) => anyhow::bail!("{message}"),
        None => anyhow::bail!("No prayer times received"),
    }
}
