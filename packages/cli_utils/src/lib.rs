#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the pollution heatmap.
//!
//! [`init_logger`] sets up `pretty_env_logger` at `info` level (overridable
//! through `RUST_LOG`), and [`report_error`] prints a one-line diagnostic
//! for a failed run without a backtrace.

use std::error::Error;

/// Initializes the global `pretty_env_logger` logger.
///
/// Defaults to `info`; `RUST_LOG` takes precedence when set. Calling this
/// more than once is harmless.
pub fn init_logger() {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .try_init()
        .ok(); // Ignore error if logger was already set (e.g., in tests)
}

/// Formats the error and its `source()` chain as
/// `"outer: caused by: inner"`, skipping causes whose text is already part
/// of the message.
#[must_use]
pub fn describe_error(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": caused by: ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }

    message
}

/// Prints a one-line diagnostic for `err` to stderr.
pub fn report_error(err: &dyn Error) {
    log::debug!("{err:?}");
    eprintln!("Error: {}", describe_error(err));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Leaf;

    impl std::fmt::Display for Leaf {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "disk full")
        }
    }

    impl Error for Leaf {}

    #[derive(Debug)]
    struct Wrapper {
        inline_cause: bool,
        leaf: Leaf,
    }

    impl std::fmt::Display for Wrapper {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            if self.inline_cause {
                write!(f, "failed to write heatmap.geojson: {}", self.leaf)
            } else {
                write!(f, "failed to write heatmap.geojson")
            }
        }
    }

    impl Error for Wrapper {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.leaf)
        }
    }

    #[test]
    fn appends_causes_missing_from_message() {
        let err = Wrapper {
            inline_cause: false,
            leaf: Leaf,
        };
        assert_eq!(
            describe_error(&err),
            "failed to write heatmap.geojson: caused by: disk full"
        );
    }

    #[test]
    fn skips_causes_already_in_message() {
        let err = Wrapper {
            inline_cause: true,
            leaf: Leaf,
        };
        assert_eq!(describe_error(&err), "failed to write heatmap.geojson: disk full");
    }

    #[test]
    fn init_logger_is_idempotent() {
        init_logger();
        init_logger();
    }
}
