//! Tracing initialization.
//!
//! Structured console logging with `RUST_LOG`-style filtering. The default
//! level is `info`; set `RUST_LOG=tickerd=debug` for request-level detail.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Call once at startup, before the
/// first request is served.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::info!("telemetry initialized");
    Ok(())
}
