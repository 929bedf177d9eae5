//! `waqt method` and `waqt methods`: inspect and save the calculation method.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::preferences::{FilePreferenceStore, PreferenceStore};
use crate::schedule::method::CalculationMethod;

/// Show the effective method, or save a new one.
pub fn run_method_command(id: Option<u8>) -> Result<()> {
    log_version!();

    let config = Config::load()?;
    let preferences = FilePreferenceStore::in_config_dir()?;

    match id {
        None => {
            let method = super::effective_method(None, &preferences, &config)?;
            log_block_start!("Calculation method: {method}");
            if preferences.calculation_method()?.is_none() {
                log_indented!("Not saved yet, using the configured default");
            }
            log_pipe!();
            log_info!("Change it with 'waqt method <id>'. 'waqt methods' lists them.");
        }
        Some(id) => {
            let method = CalculationMethod::new(id).with_context(|| {
                format!("Unknown calculation method {id} (run 'waqt methods' for the list)")
            })?;
            preferences
                .set_calculation_method(method)
                .context("Failed to save the calculation method")?;
            log_block_start!("Calculation method set to {method}");
            log_indented!("Saved to {}", preferences.path().display());
        }
    }

    log_end!();
    Ok(())
}

/// List every method, marking the one in effect.
pub fn run_methods_command() -> Result<()> {
    log_version!();

    let config = Config::load()?;
    let preferences = FilePreferenceStore::in_config_dir()?;
    let current = super::effective_method(None, &preferences, &config)?;

    log_block_start!("Calculation methods:");
    for method in CalculationMethod::all() {
        let marker = if method == current { "▸" } else { " " };
        log_indented!("{marker} {:>2}  {}", method.id(), method.name());
    }
    log_end!();
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("method - Show or save the calculation method");
    log_block_start!("Usage: waqt method [ID]");
    log_block_start!("Arguments:");
    log_indented!("ID  Method id to save (see 'waqt methods')");
    log_indented!("    If omitted, shows the method currently in effect");
    log_block_start!("Description:");
    log_indented!("The method is looked up in this order: --method for a single");
    log_indented!("run, the saved preference, then default_method in waqt.toml.");
    log_block_start!("Examples:");
    log_indented!("waqt method");
    log_indented!("waqt method 13");
    log_end!();
}
