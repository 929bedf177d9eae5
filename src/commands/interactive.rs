//! `waqt interactive`: line-driven search with debounced suggestions.
//!
//! Each input line is one intent. Plain text is a full search, `?text` feeds
//! the suggestion box, a number picks a suggestion. Updates from the session
//! and its refresh tasks are printed as they arrive.

use anyhow::{Context, Result};
use std::io;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::display::TerminalPresenter;
use crate::preferences::{FilePreferenceStore, PreferenceStore};

/// What one input line asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum LineIntent {
    /// Empty line with no suggestions showing: print the clock and countdown
    Status,
    Suggest(String),
    /// 1-based suggestion number
    Select(usize),
    Method(u8),
    Here { latitude: f64, longitude: f64 },
    Resolve(String),
    Quit,
    Invalid(String),
}

/// Read one input line. An empty line picks the first suggestion when any are showing.
pub fn parse_line(line: &str, suggestions_showing: bool) -> LineIntent {
    let line = line.trim();
    if line.is_empty() {
        return if suggestions_showing {
            LineIntent::Select(1)
        } else {
            LineIntent::Status
        };
    }
    if let Some(text) = line.strip_prefix('?') {
        return LineIntent::Suggest(text.to_string());
    }
    if let Ok(number) = line.parse::<usize>() {
        return if number == 0 {
            LineIntent::Invalid("Suggestions are numbered from 1".to_string())
        } else {
            LineIntent::Select(number)
        };
    }
    let Some(command) = line.strip_prefix(':') else {
        return LineIntent::Resolve(line.to_string());
    };

    let words: Vec<&str> = command.split_whitespace().collect();
    match words.as_slice() {
        ["q"] | ["quit"] => LineIntent::Quit,
        ["method", id] => match id.parse::<u8>() {
            Ok(id) => LineIntent::Method(id),
            Err(_) => LineIntent::Invalid(format!("Invalid method id: {id}")),
        },
        ["here", lat, lon] => match (lat.parse::<f64>(), lon.parse::<f64>()) {
            (Ok(latitude), Ok(longitude)) => LineIntent::Here {
                latitude,
                longitude,
            },
            _ => LineIntent::Invalid("Usage: :here <latitude> <longitude>".to_string()),
        },
        ["method"] => LineIntent::Invalid("Usage: :method <id>".to_string()),
        _ => LineIntent::Invalid(format!("Unknown command: {line}")),
    }
}

fn show_usage() {
    log_block_start!("Type a city and press Enter to load its prayer times.");
    log_indented!("?text         Suggest places for text");
    log_indented!("N             Pick suggestion N");
    log_indented!(":method ID    Switch calculation method");
    log_indented!(":here LAT LON Use coordinates");
    log_indented!("(empty line)  Pick suggestion 1, or show the clock");
    log_indented!(":q            Quit");
}

pub async fn run_interactive(method: Option<u8>) -> Result<()> {
    log_version!();

    let config = Config::load()?;
    let preferences = FilePreferenceStore::in_config_dir()?;
    let method = super::effective_method(method, &preferences, &config)?;
    let dark_mode = preferences.dark_mode()?;
    let last_city = preferences.last_city()?;

    let super::SessionHandles {
        mut session,
        mut updates,
        mut fired,
    } = super::open_session(&config, preferences, method)?;
    let mut presenter = TerminalPresenter::new(io::stdout(), dark_mode, false);

    show_usage();
    session.start();
    if let Some(city) = last_city {
        session.resolve(&city).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(update) = updates.recv() => presenter.present(&update)?,
            Some(text) = fired.recv() => session.run_suggestions(&text).await,
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                let suggestions_showing = !session.state().suggestions.is_empty();
                match parse_line(&line, suggestions_showing) {
                    LineIntent::Quit => break,
                    LineIntent::Status => presenter.print_status()?,
                    LineIntent::Suggest(text) => session.on_input(&text),
                    LineIntent::Select(number) => {
                        let picked = session.state().suggestions.get(number - 1).cloned();
                        match picked {
                            Some(candidate) => session.select_candidate(candidate).await,
                            None => log_warning!("No suggestion {number}"),
                        }
                    }
                    LineIntent::Method(id) => session.change_method(id).await,
                    LineIntent::Here { latitude, longitude } => {
                        session
                            .resolve_current_location(Ok((latitude, longitude)))
                            .await
                    }
                    LineIntent::Resolve(text) => session.resolve(&text).await,
                    LineIntent::Invalid(message) => log_warning!("{message}"),
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    session.shutdown();
    presenter.finish()?;
    log_end!();
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("interactive - Search and pick places line by line");
    log_block_start!("Usage: waqt interactive");
    log_block_start!("Input:");
    log_indented!("<city>         Load prayer times; a listed suggestion with the");
    log_indented!("               same name is picked directly");
    log_indented!("?<text>        Suggest places once typing pauses");
    log_indented!("<N>            Pick suggestion N");
    log_indented!(":method <id>   Switch and save the calculation method");
    log_indented!(":here <lat> <lon>  Use coordinates instead of a name");
    log_indented!("(empty line)   Pick the first suggestion when any are");
    log_indented!("               listed, else show the clock and countdown");
    log_indented!(":q, :quit      Quit (Ctrl+C and end of input work too)");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("   ", false), LineIntent::Status);
        assert_eq!(parse_line("?Lon", false), LineIntent::Suggest("Lon".to_string()));
        assert_eq!(parse_line(" 3 ", false), LineIntent::Select(3));
        assert_eq!(
            parse_line("New York", false),
            LineIntent::Resolve("New York".to_string())
        );
        assert_eq!(parse_line(":method 5", false), LineIntent::Method(5));
        assert_eq!(
            parse_line(":here -33.86 151.2", false),
            LineIntent::Here {
                latitude: -33.86,
                longitude: 151.2
            }
        );
        assert_eq!(parse_line(":q", false), LineIntent::Quit);
        assert_eq!(parse_line(":quit", false), LineIntent::Quit);
    }

    #[test]
    fn test_enter_picks_first_suggestion_when_listed() {
        assert_eq!(parse_line("", true), LineIntent::Select(1));
        assert_eq!(parse_line("  ", false), LineIntent::Status);
        assert_eq!(parse_line("2", true), LineIntent::Select(2));
        assert_eq!(
            parse_line("Doha", true),
            LineIntent::Resolve("Doha".to_string())
        );
    }

    #[test]
    fn test_parse_line_rejects_bad_commands() {
        assert!(matches!(parse_line("0", false), LineIntent::Invalid(_)));
        assert!(matches!(parse_line(":method", false), LineIntent::Invalid(_)));
        assert!(matches!(parse_line(":method x", false), LineIntent::Invalid(_)));
        assert!(matches!(parse_line(":here 1", false), LineIntent::Invalid(_)));
        assert!(matches!(parse_line(":dance", false), LineIntent::Invalid(_)));
    }
}
