//! Main application entry point.
//!
//! Parses the command line, applies the process-wide settings (debug output,
//! log file, simulated clock, configuration directory) and runs the chosen
//! command on a single-threaded tokio runtime.

use anyhow::{Context, Result};
use std::sync::Arc;

use waqt::args::{self, CliAction, Command, GlobalOptions, ParsedArgs};
use waqt::commands;
use waqt::config;
use waqt::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use waqt::log_error_standalone;
use waqt::logger::Log;
use waqt::time_source::{self, SimulatedTimeSource};

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let code = match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            EXIT_SUCCESS
        }
        CliAction::ShowHelp => {
            args::display_help();
            EXIT_SUCCESS
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            EXIT_FAILURE
        }
        CliAction::Help { command } => {
            match commands::help::run_help_command(command.as_deref()) {
                Ok(()) => EXIT_SUCCESS,
                Err(_) => EXIT_FAILURE,
            }
        }
        CliAction::Run { options, command } => match run(&options, command) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                // JSON output silences the logger; errors are always shown
                Log::set_enabled(true);
                log_error_standalone!("{e:#}");
                EXIT_FAILURE
            }
        },
    };

    std::process::exit(code);
}

fn run(options: &GlobalOptions, command: Command) -> Result<()> {
    // Keep the guard alive until the command finishes so the file is flushed
    let _log_guard = match &options.log_file {
        Some(path) => Some(
            Log::start_file_logging(path.clone())
                .with_context(|| format!("Failed to start logging to {path}"))?,
        ),
        None => None,
    };

    Log::set_debug(options.debug_enabled);

    if let Some(at) = &options.at {
        let start = time_source::parse_datetime(at).map_err(anyhow::Error::msg)?;
        time_source::init_time_source(Arc::new(SimulatedTimeSource::new(start)));
    }

    config::set_config_dir(options.config_dir.clone())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    runtime.block_on(commands::dispatch(command, options))
}
