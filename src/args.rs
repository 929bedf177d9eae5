//! Command-line argument parsing and processing.
//!
//! Arguments are split into global flags, which may appear anywhere, and one
//! command followed by its positional arguments. Parsing never fails hard:
//! problems are reported with a warning and turn into
//! [`CliAction::ShowHelpDueToError`].

/// Flags that apply to every command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalOptions {
    pub debug_enabled: bool,
    pub config_dir: Option<String>,
    /// Calculation method for this run only, not persisted.
    pub method: Option<u8>,
    /// Simulated start time, `YYYY-MM-DD HH:MM:SS`.
    pub at: Option<String>,
    pub log_file: Option<String>,
}

/// A command that needs configuration and, usually, the network.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Print today's schedule once
    Today { city: Option<String>, json: bool },
    /// Show the schedule with a live clock and countdown
    Watch { city: Option<String> },
    /// List ranked place suggestions
    Search { text: String },
    /// Schedule for explicit coordinates
    Locate { latitude: f64, longitude: f64 },
    /// Show or save the calculation method
    Method { id: Option<u8> },
    /// List calculation methods
    Methods,
    /// Line-driven search with suggestions
    Interactive,
    /// Save the colour theme
    Theme { dark_mode: bool },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Today { .. } => "today",
            Command::Watch { .. } => "watch",
            Command::Search { .. } => "search",
            Command::Locate { .. } => "locate",
            Command::Method { .. } => "method",
            Command::Methods => "methods",
            Command::Interactive => "interactive",
            Command::Theme { .. } => "theme",
        }
    }
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    Run {
        options: GlobalOptions,
        command: Command,
    },
    /// `waqt help [COMMAND]`
    Help { command: Option<String> },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to invalid arguments and exit with failure
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

/// A leading dash marks a flag unless the argument is a number (`-33.86`).
fn is_flag(arg: &str) -> bool {
    arg.starts_with('-') && arg.parse::<f64>().is_err()
}

fn error_action() -> ParsedArgs {
    ParsedArgs {
        action: CliAction::ShowHelpDueToError,
    }
}

fn join_city(words: &[String]) -> Option<String> {
    let city = words.join(" ");
    let city = city.trim();
    if city.is_empty() {
        None
    } else {
        Some(city.to_string())
    }
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut options = GlobalOptions::default();
        let mut display_help = false;
        let mut display_version = false;
        let mut json = false;
        let mut unknown_arg_found = false;
        let mut positionals: Vec<String> = Vec::new();

        let mut i = 0;
        while i < args_vec.len() {
            let arg = &args_vec[i];
            if !is_flag(arg) {
                positionals.push(arg.clone());
                i += 1;
                continue;
            }

            // Flags that take a value consume the next argument
            let value = args_vec.get(i + 1).filter(|next| !is_flag(next)).cloned();
            match arg.as_str() {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" => display_version = true,
                "--debug" | "-d" => options.debug_enabled = true,
                "--json" => json = true,
                "--config" | "-c" => match value {
                    Some(dir) => {
                        options.config_dir = Some(dir);
                        i += 1;
                    }
                    None => {
                        log_warning!("Missing directory for --config. Usage: --config <directory>");
                        unknown_arg_found = true;
                    }
                },
                "--method" | "-m" => match value.as_deref().map(str::parse::<u8>) {
                    Some(Ok(id)) => {
                        options.method = Some(id);
                        i += 1;
                    }
                    Some(Err(_)) => {
                        log_warning!("Invalid method id: {}", args_vec[i + 1]);
                        unknown_arg_found = true;
                        i += 1;
                    }
                    None => {
                        log_warning!("Missing id for --method. Usage: --method <id>");
                        unknown_arg_found = true;
                    }
                },
                "--at" => match value {
                    Some(at) => {
                        options.at = Some(at);
                        i += 1;
                    }
                    None => {
                        log_warning!(
                            "Missing time for --at. Usage: --at \"YYYY-MM-DD HH:MM:SS\""
                        );
                        unknown_arg_found = true;
                    }
                },
                "--log" => match value {
                    Some(path) => {
                        options.log_file = Some(path);
                        i += 1;
                    }
                    None => {
                        log_warning!("Missing file for --log. Usage: --log <file>");
                        unknown_arg_found = true;
                    }
                },
                other => {
                    log_warning!("Unknown option: {other}");
                    unknown_arg_found = true;
                }
            }
            i += 1;
        }

        // Help and version take precedence over everything else
        if display_version {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if display_help {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }
        if unknown_arg_found {
            return error_action();
        }

        let (command, rest) = match positionals.split_first() {
            Some((command, rest)) => (command.as_str(), rest),
            None => ("watch", &[][..]),
        };

        let command = match command {
            "today" | "t" => Command::Today {
                city: join_city(rest),
                json,
            },
            "watch" | "w" => Command::Watch {
                city: join_city(rest),
            },
            "search" | "s" => match join_city(rest) {
                Some(text) => Command::Search { text },
                None => {
                    log_warning!("Missing search text. Usage: waqt search <text>");
                    return error_action();
                }
            },
            "locate" | "l" => match rest {
                [lat, lon] => match (lat.parse::<f64>(), lon.parse::<f64>()) {
                    (Ok(latitude), Ok(longitude))
                        if (-90.0..=90.0).contains(&latitude)
                            && (-180.0..=180.0).contains(&longitude) =>
                    {
                        Command::Locate {
                            latitude,
                            longitude,
                        }
                    }
                    _ => {
                        log_warning!(
                            "Invalid coordinates. Latitude must be within ±90 and longitude within ±180"
                        );
                        return error_action();
                    }
                },
                _ => {
                    log_warning!(
                        "Expected two coordinates. Usage: waqt locate <latitude> <longitude>"
                    );
                    return error_action();
                }
            },
            "method" | "m" => match rest {
                [] => Command::Method { id: None },
                [id] => match id.parse::<u8>() {
                    Ok(id) => Command::Method { id: Some(id) },
                    Err(_) => {
                        log_warning!("Invalid method id: {id}. Usage: waqt method [id]");
                        return error_action();
                    }
                },
                _ => {
                    log_warning!("Too many arguments. Usage: waqt method [id]");
                    return error_action();
                }
            },
            "methods" => Command::Methods,
            "interactive" | "i" => Command::Interactive,
            "theme" => match rest {
                [mode] if mode == "dark" => Command::Theme { dark_mode: true },
                [mode] if mode == "light" => Command::Theme { dark_mode: false },
                _ => {
                    log_warning!("Usage: waqt theme <dark|light>");
                    return error_action();
                }
            },
            "help" | "h" => {
                return ParsedArgs {
                    action: CliAction::Help {
                        command: rest.first().cloned(),
                    },
                };
            }
            unknown => {
                log_warning!("Unknown command: {unknown}");
                return error_action();
            }
        };

        // Commands without positional arguments reject extras
        let takes_no_arguments = matches!(command, Command::Methods | Command::Interactive);
        if takes_no_arguments && !rest.is_empty() {
            log_warning!(
                "Unexpected argument for {}: {}",
                command.name(),
                rest.join(" ")
            );
            return error_action();
        }

        if json && !matches!(command, Command::Today { .. }) {
            log_warning!("--json only applies to 'waqt today'");
            return error_action();
        }

        ParsedArgs {
            action: CliAction::Run { options, command },
        }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("waqt [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-m, --method <id>      Calculation method for this run");
    log_indented!("    --at <datetime>    Pretend the clock starts at \"YYYY-MM-DD HH:MM:SS\"");
    log_indented!("    --log <file>       Write all output to a file");
    log_indented!("    --json             Print the schedule as JSON (today only)");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("today, t [city]        Print today's prayer times");
    log_indented!("watch, w [city]        Live clock and countdown (default)");
    log_indented!("search, s <text>       List matching places");
    log_indented!("locate, l <lat> <lon>  Prayer times for coordinates");
    log_indented!("method, m [id]         Show or save the calculation method");
    log_indented!("methods                List calculation methods");
    log_indented!("interactive, i         Search and pick places line by line");
    log_indented!("theme <dark|light>     Save the colour theme");
    log_indented!("help, h [COMMAND]      Show detailed help for a command");
    log_pipe!();
    log_info!("Without a city, the last searched city is used.");
    log_end!();
}
