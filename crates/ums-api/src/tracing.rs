//! Tracing and logging configuration for the application
//!
//! Pretty, human-readable output in development and JSON in production.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

const DEVELOPMENT_FILTER: &str = "debug,ums_api=debug,ums_db=debug,tower_http=debug,sqlx=warn";
const PRODUCTION_FILTER: &str = "info,tower_http=info,sqlx=warn";

/// Initialize tracing/logging based on the environment
///
/// # Environment Variables
/// - `RUST_LOG`: Override default log level (e.g., `RUST_LOG=debug,sqlx=info`)
///
/// Calling it more than once is harmless; only the first subscriber is kept.
pub fn init_tracing(env: &Environment) {
    let initialized = if env.is_development() {
        init_development_tracing()
    } else {
        init_production_tracing()
    };

    if initialized {
        tracing::info!(environment = %env, "Tracing initialized");
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Pretty output with file and line numbers
fn init_development_tracing() -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .pretty()
                .with_filter(env_filter(DEVELOPMENT_FILTER)),
        )
        .try_init()
        .is_ok()
}

/// JSON output for log aggregation, with the request span flattened in
fn init_production_tracing() -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .flatten_event(true)
                .with_target(true)
                .with_filter(env_filter(PRODUCTION_FILTER)),
        )
        .try_init()
        .is_ok()
}
