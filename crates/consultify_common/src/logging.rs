// --- File: crates/consultify_common/src/logging.rs ---
//! Logging utilities shared by all Consultify crates.
//!
//! Call [`init`] (or [`init_with_level`]) once at startup. Initialization
//! uses `try_init` so tests that set up their own subscriber are unaffected.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with the default log level (INFO).
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` overrides still apply; the given level only sets the default
/// for the `consultify` crates.
pub fn init_with_level(level: Level) {
    let filter = match format!("consultify={}", level).parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}
