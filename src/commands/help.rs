//! Help command implementation for waqt.
//!
//! Dispatches to command-specific help or shows the command overview.

use anyhow::Result;

/// Run the help command (dispatcher)
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = general help)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_general_help(),
        Some("today") | Some("t") => super::today::display_help(),
        Some("watch") | Some("w") => super::watch::display_help(),
        Some("search") | Some("s") => super::search::display_help(),
        Some("locate") | Some("l") => super::locate::display_help(),
        Some("method") | Some("m") | Some("methods") => super::method::display_help(),
        Some("interactive") | Some("i") => super::interactive::display_help(),
        Some("theme") => super::theme::display_help(),
        Some("help") | Some("h") => display_help_help(),
        Some(unknown) => {
            log_warning!("Unknown command: {}", unknown);
            display_general_help();
        }
    }
    Ok(())
}

/// Display general help focused on commands
fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_indented!("today, t [city]        Print today's prayer times");
    log_indented!("watch, w [city]        Live clock and countdown");
    log_indented!("search, s <text>       List matching places");
    log_indented!("locate, l <lat> <lon>  Prayer times for coordinates");
    log_indented!("method, m [id]         Show or save the calculation method");
    log_indented!("methods                List calculation methods");
    log_indented!("interactive, i         Search and pick places line by line");
    log_indented!("theme <dark|light>     Save the colour theme");
    log_indented!("help, h [COMMAND]      Show detailed help for a command");
    log_pipe!();
    log_info!("Use 'waqt help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'waqt --help' to see all options and general usage.");
    log_end!();
}

/// Display help for the help command itself
fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: waqt help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("waqt help");
    log_indented!("waqt help watch");
    log_end!();
}
