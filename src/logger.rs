//! Structured logging system with visual formatting.
//!
//! This module provides the logging system used by every part of waqt. It includes
//! different log levels and special formatting functions for creating structured
//! output with Unicode box drawing characters.
//!
//! The logger supports runtime enable/disable functionality for quiet operation
//! during JSON output or testing, and an optional debug channel that is only
//! printed when `--debug` is active.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

// Channel for routing output to file when --log is active
static LOG_CHANNEL: OnceLock<Option<Sender<LogMessage>>> = OnceLock::new();

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Main logging interface providing structured output formatting.
///
/// ## Logging Conventions
///
/// - **`log_block_start!`**: starts a new conceptual block (a fetch, a resolved
///   location, a schedule). Prints an empty pipe `┃` for spacing, then `┣ message`.
/// - **`log_decorated!`**: a line that belongs to the current block. Prints `┣ message`.
/// - **`log_indented!`**: nested details of the current block. Prints `┃   message`.
/// - **`log_pipe!`**: a single empty `┃` line, used before `log_warning!`,
///   `log_error!` or `log_info!` when they open a new block.
/// - **`log_version!`**: the startup header `┏ waqt vX.Y.Z ━━╸`.
/// - **`log_end!`**: the final `╹` marker.
/// - **`log_info!`, `log_warning!`, `log_error!`**: `[LEVEL]` prefixed
///   semantic messages.
/// - **`log_debug!`**: like `log_info!` but only printed when debug output is enabled.
pub struct Log;

impl Log {
    /// Enable or disable logging temporarily.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Enable or disable `log_debug!` output.
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if `log_debug!` output is printed.
    pub fn is_debug() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Start file logging to the specified path.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let (tx, rx) = channel();

        LOG_CHANNEL
            .set(Some(tx.clone()))
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        let handle = std::thread::spawn(move || {
            let mut file = std::fs::File::create(&file_path)?;

            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => {
                        file.write_all(text.as_bytes())?;
                    }
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }

            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }

    /// Get timestamp prefix for simulated time.
    ///
    /// Shows `[HH:MM:SS]` of the simulated clock when `--at` is active, and nothing
    /// otherwise. Public for macro access.
    pub fn get_timestamp_prefix() -> String {
        if crate::time_source::is_initialized() && crate::time_source::is_simulated() {
            format!("[{}] ", crate::time_source::now().format("%H:%M:%S"))
        } else {
            String::new()
        }
    }
}

/// Guard for file logging that ensures clean shutdown.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Strip ANSI control sequences (`ESC [ ... <letter>`) from text.
pub(crate) fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next();
                for ch in chars.by_ref() {
                    if ch.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                result.push(ch);
            }
        } else {
            result.push(ch);
        }
    }

    result
}

// Public function that routes output (needed by macros)
pub fn write_output(text: &str) {
    if let Some(Some(tx)) = LOG_CHANNEL.get() {
        let clean_text = strip_ansi_codes(text);
        let _ = tx.send(LogMessage::Formatted(clean_text));
    } else {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

/// Write one line, `lead` first, behind the simulated-time prefix. Public for macro access.
pub fn emit(lead: &str, message: &str) {
    let prefix = Log::get_timestamp_prefix();
    write_output(&format!("{prefix}{lead}{message}\n"));
}

// # Logging Macros

#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($lead:expr, $fmt:literal $($arg:tt)*) => {
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit($lead, &format!($fmt $($arg)*));
        }
    };
    ($lead:expr, $expr:expr) => {
        if $crate::logger::Log::is_enabled() {
            $crate::logger::emit($lead, &$expr.to_string());
        }
    };
}

/// Log a decorated message, typically as part of an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($($arg:tt)+) => {{ $crate::__log_line!("┣ ", $($arg)+) }};
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($($arg:tt)+) => {{ $crate::__log_line!("┃   ", $($arg)+) }};
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {{ $crate::__log_line!("┃", "") }};
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    ($($arg:tt)+) => {{
        $crate::log_pipe!();
        $crate::__log_line!("┣ ", $($arg)+)
    }};
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {{ $crate::__log_line!("┏ ", "waqt v{} ━━╸", env!("CARGO_PKG_VERSION")) }};
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {{ $crate::__log_line!("╹", "") }};
}

/// Log a warning message with pipe prefix and yellow-colored text.
#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)+) => {{ $crate::__log_line!("┣[\x1b[33mWARNING\x1b[0m] ", $($arg)+) }};
}

/// Log an error message with pipe prefix and red-colored text.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => {{ $crate::__log_line!("┣[\x1b[31mERROR\x1b[0m] ", $($arg)+) }};
}

/// Log an error message without the pipe prefix (standalone).
#[macro_export]
macro_rules! log_error_standalone {
    ($($arg:tt)+) => {{ $crate::__log_line!("[\x1b[31mERROR\x1b[0m] ", $($arg)+) }};
}

/// Log an informational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => {{ $crate::__log_line!("┣[\x1b[32mINFO\x1b[0m] ", $($arg)+) }};
}

/// Log a debug message. Printed only when debug output is enabled.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => {{
        if $crate::logger::Log::is_debug() {
            $crate::__log_line!("┣[\x1b[36mDEBUG\x1b[0m] ", $($arg)+)
        }
    }};
}
