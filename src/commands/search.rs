//! `waqt search`: list ranked place suggestions for some text.

use anyhow::Result;
use std::io;

use crate::config::Config;
use crate::display::TerminalPresenter;
use crate::preferences::{FilePreferenceStore, PreferenceStore};
use crate::session::UiUpdate;

pub async fn run_search(text: &str) -> Result<()> {
    log_version!();

    let config = Config::load()?;
    let preferences = FilePreferenceStore::in_config_dir()?;
    let dark_mode = preferences.dark_mode()?;
    let method = super::effective_method(None, &preferences, &config)?;

    let mut handles = super::open_session(&config, preferences, method)?;
    handles.session.run_suggestions(text).await;

    let updates = super::drain(&mut handles.updates);
    let mut presenter = TerminalPresenter::new(io::stdout(), dark_mode, false);
    for update in &updates {
        match update {
            UiUpdate::Suggestions(candidates) => {
                log_block_start!("Places matching \"{}\"", text.trim());
                presenter.render_suggestions(candidates)?;
            }
            UiUpdate::Error(message) => anyhow::bail!("{message}"),
            _ => {}
        }
    }

    log_pipe!();
    log_info!("Use 'waqt today <city>' to see prayer times for a place.");
    log_end!();
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("search - List places matching some text");
    log_block_start!("Usage: waqt search <TEXT...>");
    log_block_start!("Description:");
    log_indented!("Shows up to eight cities and towns, most relevant first.");
    log_indented!("Text shorter than two characters is not searched.");
    log_block_start!("Examples:");
    log_indented!("waqt search spring");
    log_indented!("waqt search san fr");
    log_end!();
}
