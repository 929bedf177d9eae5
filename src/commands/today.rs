//! `waqt today`: print today's schedule once.

use anyhow::{Context, Result};
use std::io;

use crate::config::Config;
use crate::display::TerminalPresenter;
use crate::logger::Log;
use crate::preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};

pub async fn run_today(city: Option<String>, method: Option<u8>, json: bool) -> Result<()> {
    if json {
        Log::set_enabled(false);
    } else {
        log_version!();
    }

    let config = Config::load()?;
    let file_store = FilePreferenceStore::in_config_dir()?;
    // JSON runs are for scripts and leave saved preferences untouched
    let preferences: Box<dyn PreferenceStore> = if json {
        Box::new(MemoryPreferenceStore::new(file_store.load()?))
    } else {
        Box::new(file_store)
    };

    let city = super::city_or_last(city, &preferences)?;
    let method = super::effective_method(method, &preferences, &config)?;
    let dark_mode = preferences.dark_mode()?;

    let mut handles = super::open_session(&config, preferences, method)?;
    handles.session.resolve(&city).await;
    handles.session.shutdown();

    let updates = super::drain(&mut handles.updates);
    let view = super::schedule_or_error(&updates)?;

    if json {
        let text = serde_json::to_string_pretty(view).context("Failed to serialize schedule")?;
        println!("{text}");
        return Ok(());
    }

    let mut presenter = TerminalPresenter::new(io::stdout(), dark_mode, false);
    presenter.render_schedule(view)?;
    log_end!();
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("today - Print today's prayer times");
    log_block_start!("Usage: waqt today [OPTIONS] [CITY...]");
    log_block_start!("Arguments:");
    log_indented!("CITY  City to look up; words are joined with spaces");
    log_indented!("      If omitted, the last searched city is used");
    log_block_start!("Options:");
    log_indented!("--json           Print the schedule as JSON without saving anything");
    log_indented!("-m, --method <id>  Calculation method for this run");
    log_block_start!("Examples:");
    log_indented!("# Times for Cairo");
    log_indented!("waqt today Cairo");
    log_pipe!();
    log_indented!("# Machine-readable output with the Muslim World League method");
    log_indented!("waqt today \"Kuala Lumpur\" --json --method 3");
    log_end!();
}
