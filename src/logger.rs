//! Structured logging system with visual formatting.
//!
//! This module provides the logging system behind skyplan's terminal output.
//! It includes different log levels and special formatting functions for
//! creating structured output with Unicode box drawing characters.
//!
//! The logger supports runtime enable/disable functionality for quiet
//! operation when command output is piped or consumed by tests.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

// Use an AtomicBool instead of thread_local for thread safety
static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

/// Main logging interface providing structured output formatting.
///
/// ## Logging Conventions
///
/// - **`log_block_start!`**: initiates a new conceptual block of log
///   information (a command header, a new event section). Prepends an empty
///   pipe `┃` for spacing, then prints `┣ message`. Follow-up lines within the
///   block should use `log_decorated!` or `log_indented!`.
/// - **`log_decorated!`**: a message that continues an existing block, or a
///   simple one-line status that still fits the pipe structure (`┣ message`).
/// - **`log_indented!`**: nested detail lines belonging to a parent message
///   (`┃   message`).
/// - **`log_pipe!`**: a single empty `┃` line for vertical spacing, mainly
///   before `log_warning!`/`log_error!` or an `anyhow` error message.
/// - **`log_version!`**: the application startup header, printed once.
/// - **`log_end!`**: the final `╹` termination marker, printed once.
/// - **`log_warning!`, `log_error!`, `log_debug!`**: semantic level-prefixed
///   messages for cases that don't fit the box-drawing flow.
pub struct Log;

impl Log {
    /// Enable or disable logging temporarily.
    ///
    /// This is useful for quiet operation during automated processes
    /// or testing where log output would interfere with results.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }
}

// Public function that routes output (needed by macros)
pub fn write_output(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

// # Logging Macros

/// Log a decorated message, typically as part of an existing block or for standalone emphasis.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::logger::write_output(&format!("┣ {message}\n"));
        }
    }};
    ($expr:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::logger::write_output(&format!("┣ {expr}\n"));
        }
    }};
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::logger::write_output(&format!("┃   {message}\n"));
        }
    }};
    ($expr:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::logger::write_output(&format!("┃   {expr}\n"));
        }
    }};
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            $crate::logger::write_output("┃\n");
        }
    }};
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::logger::write_output(&format!("┃\n┣ {message}\n"));
        }
    }};
    ($expr:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::logger::write_output(&format!("┃\n┣ {expr}\n"));
        }
    }};
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let version = env!("CARGO_PKG_VERSION");
            $crate::logger::write_output(&format!("┏ skyplan v{version} ━━╸\n"));
        }
    }};
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            $crate::logger::write_output("╹\n");
        }
    }};
}

/// Log a warning message with pipe prefix and yellow-colored text.
#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::logger::write_output(&format!("┣[\x1b[33mWARNING\x1b[0m] {message}\n"));
        }
    }};
    ($expr:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::logger::write_output(&format!("┣[\x1b[33mWARNING\x1b[0m] {expr}\n"));
        }
    }};
}

/// Log an error message with pipe prefix and red-colored text.
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::logger::write_output(&format!("┣[\x1b[31mERROR\x1b[0m] {message}\n"));
        }
    }};
    ($expr:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::logger::write_output(&format!("┣[\x1b[31mERROR\x1b[0m] {expr}\n"));
        }
    }};
}

/// Log an error message with a pipe prefix and terminal corner (standalone).
/// This adds a pipe before the error, similar to log_block_start!, to indicate flow termination.
#[macro_export]
macro_rules! log_error_exit {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::logger::write_output(&format!("┃\n┗[\x1b[31mERROR\x1b[0m] {message}\n"));
        }
    }};
    ($expr:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::logger::write_output(&format!("┃\n┗[\x1b[31mERROR\x1b[0m] {expr}\n"));
        }
    }};
}

/// Log a debug/operational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::logger::write_output(&format!("┣[\x1b[32mDEBUG\x1b[0m] {message}\n"));
        }
    }};
    ($expr:expr) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::logger::write_output(&format!("┣[\x1b[32mDEBUG\x1b[0m] {expr}\n"));
        }
    }};
}
