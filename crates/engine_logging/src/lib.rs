#![deny(missing_docs)]
//! Shared logging utilities for the mangadl workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! a helper that flattens an error and its sources into one log line, and a
//! minimal test initializer for the global logger.

use std::error::Error;
use std::fmt::Write;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Renders an error followed by each of its sources, separated by `": "`.
///
/// Sources whose message is already contained in the outer message are
/// skipped, so `#[error("io error: {0}")]`-style wrappers do not repeat.
pub fn error_chain(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !rendered.contains(&text) {
            let _ = write!(&mut rendered, ": {text}");
        }
        source = inner.source();
    }
    rendered
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::error_chain;
    use std::fmt;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "failed to write page")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn chain_appends_sources() {
        let err = Outer(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert_eq!(error_chain(&err), "failed to write page: disk full");
    }

    #[test]
    fn plain_error_renders_once() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert_eq!(error_chain(&err), "boom");
    }
}
