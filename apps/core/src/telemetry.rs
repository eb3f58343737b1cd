//! Tracing initialization helpers for the hosting process.

use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a human-readable subscriber, filtered by `RUST_LOG` (default
/// `info`). Safe to call more than once; later calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Installs a JSON (bunyan) subscriber writing to stdout, for deployments
/// that ship logs to an aggregator. Safe to call more than once.
pub fn init_json(service_name: &str) {
    let formatting_layer = BunyanFormattingLayer::new(service_name.to_string(), std::io::stdout);
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(JsonStorageLayer)
        .with(formatting_layer)
        .try_init();
}
