//! # Structured Logging
//!
//! Environment-aware tracing setup. `RUST_LOG` takes precedence; otherwise
//! the level defaults by `APP_ENV` (debug outside production). Production
//! output is JSON for log aggregation, everything else human-readable.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize the global tracing subscriber. Safe to call more than once;
/// later calls (e.g. from tests) are no-ops.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(&environment));

        let registry = tracing_subscriber::registry().with(filter);

        let result = if environment == "production" {
            registry
                .with(fmt::layer().json().with_target(true))
                .try_init()
        } else {
            registry
                .with(fmt::layer().with_target(true).with_level(true))
                .try_init()
        };

        if result.is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }
    });
}

fn get_environment() -> String {
    std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string())
}

fn default_filter(environment: &str) -> EnvFilter {
    match environment {
        "production" => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    }
}
