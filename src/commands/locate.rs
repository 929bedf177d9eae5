//! `waqt locate`: schedule for explicit coordinates.

use anyhow::Result;
use std::io;

use crate::config::Config;
use crate::display::TerminalPresenter;
use crate::preferences::{FilePreferenceStore, PreferenceStore};

pub async fn run_locate(latitude: f64, longitude: f64, method: Option<u8>) -> Result<()> {
    log_version!();

    let config = Config::load()?;
    let preferences = FilePreferenceStore::in_config_dir()?;
    let method = super::effective_method(method, &preferences, &config)?;
    let dark_mode = preferences.dark_mode()?;

    let mut handles = super::open_session(&config, preferences, method)?;
    handles
        .session
        .resolve_current_location(Ok((latitude, longitude)))
        .await;
    handles.session.shutdown();

    let updates = super::drain(&mut handles.updates);
    let view = super::schedule_or_error(&updates)?;

    let mut presenter = TerminalPresenter::new(io::stdout(), dark_mode, false);
    presenter.render_schedule(view)?;
    log_end!();
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("locate - Prayer times for a latitude and longitude");
    log_block_start!("Usage: waqt locate <LATITUDE> <LONGITUDE>");
    log_block_start!("Arguments:");
    log_indented!("<LATITUDE>   Decimal degrees, -90 to 90");
    log_indented!("<LONGITUDE>  Decimal degrees, -180 to 180");
    log_block_start!("Description:");
    log_indented!("Skips place search. The title is taken from the timezone the");
    log_indented!("timings service reports for the position.");
    log_block_start!("Examples:");
    log_indented!("waqt locate 21.4225 39.8262");
    log_indented!("waqt locate -33.8688 151.2093");
    log_end!();
}
