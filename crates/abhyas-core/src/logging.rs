//! Tracing subscriber setup for host processes and tests.
//!
//! The engine itself only emits through `tracing`; installing a subscriber is
//! the host's job. This helper covers the common case so embedding clients
//! and integration tests do not each reinvent it.
//!
//! Environment variables:
//!   LOG_FORMAT - "text" (default) or "json"
//!   RUST_LOG   - standard env filter (default: "abhyas=debug")

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global subscriber from environment configuration.
///
/// Safe to call at most once per process; later calls return an error from
/// the underlying registry which callers may ignore in tests.
pub fn init() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "abhyas=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }

    Ok(())
}
