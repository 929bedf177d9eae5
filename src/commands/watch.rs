//! `waqt watch`: the schedule with a live clock and countdown until Ctrl+C.

use anyhow::Result;
use std::io;

use crate::config::Config;
use crate::display::TerminalPresenter;
use crate::logger::Log;
use crate::preferences::{FilePreferenceStore, PreferenceStore};

pub async fn run_watch(city: Option<String>, method: Option<u8>) -> Result<()> {
    log_version!();

    let config = Config::load()?;
    if Log::is_debug() {
        config.log_config();
    }
    let preferences = FilePreferenceStore::in_config_dir()?;
    let city = super::city_or_last(city, &preferences)?;
    let method = super::effective_method(method, &preferences, &config)?;
    let dark_mode = preferences.dark_mode()?;

    let super::SessionHandles {
        mut session,
        mut updates,
        ..
    } = super::open_session(&config, preferences, method)?;
    let mut presenter = TerminalPresenter::new(io::stdout(), dark_mode, true);

    // The clock runs on device time until a schedule arrives, and keeps
    // running if the fetch fails
    session.start();
    session.resolve(&city).await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(update) => presenter.present(&update)?,
                None => break,
            },
            _ = &mut ctrl_c => break,
        }
    }

    session.shutdown();
    presenter.finish()?;
    log_block_start!("Stopped");
    log_end!();
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("watch - Live clock and countdown to the next prayer");
    log_block_start!("Usage: waqt watch [OPTIONS] [CITY...]");
    log_block_start!("Arguments:");
    log_indented!("CITY  City to look up; if omitted, the last searched city is used");
    log_block_start!("Description:");
    log_indented!("Prints the day's schedule, then keeps one status line updated");
    log_indented!("with the clock in the city's timezone and the time left until");
    log_indented!("the next prayer. When a prayer time passes, the countdown moves");
    log_indented!("on to the following one. Press Ctrl+C to stop.");
    log_block_start!("Examples:");
    log_indented!("waqt watch Istanbul");
    log_pipe!();
    log_indented!("# Rehearse the evening from a fixed start time");
    log_indented!("waqt watch Istanbul --at \"2026-01-15 18:55:00\"");
    log_end!();
}
