//! `waqt theme`: save the colour theme.

use anyhow::{Context, Result};

use crate::preferences::{FilePreferenceStore, PreferenceStore};

pub fn run_theme_command(dark_mode: bool) -> Result<()> {
    log_version!();

    let preferences = FilePreferenceStore::in_config_dir()?;
    preferences
        .set_dark_mode(dark_mode)
        .context("Failed to save the theme")?;

    let name = if dark_mode { "dark" } else { "light" };
    log_block_start!("Theme set to {name}");
    log_end!();
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("theme - Save the colour theme");
    log_block_start!("Usage: waqt theme <dark|light>");
    log_block_start!("Description:");
    log_indented!("Picks colours suited to a dark or light terminal background.");
    log_indented!("Light is used until a theme is saved.");
    log_end!();
}
