//! Logging utilities for the quote verification service.
//!
//! The binary calls [`init`] once at startup; library crates only use the
//! `tracing` macros.

use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Target prefix shared by all workspace crates (`quoteverify_*`).
const WORKSPACE_TARGET: &str = "quoteverify";

/// Initialize the tracing subscriber at INFO level.
///
/// Uses `RUST_LOG` when set, otherwise logs the workspace crates at INFO.
///
/// # Examples
///
/// ```
/// use quoteverify_common::logging;
///
/// logging::init();
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber; without `RUST_LOG` the workspace crates log at `level`.
pub fn init_with_level(level: Level) {
    // RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", WORKSPACE_TARGET, level)));

    // try_init: a global subscriber may already be set (tests, embedding)
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}
