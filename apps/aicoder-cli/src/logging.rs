//! Logging initialization.
//!
//! All log output goes to stderr so stdout only carries the result line.
//! `RUST_LOG` takes precedence; otherwise the level follows `-v`.

use anyhow::{Result, anyhow};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: u8, json: bool) -> Result<()> {
    build_subscriber(verbose, json)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}

/// Build the subscriber without registering it globally.
fn build_subscriber(verbose: u8, json: bool) -> impl tracing::Subscriber + Send + Sync {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let layer = if json {
        fmt_layer.json().boxed()
    } else {
        fmt_layer.boxed()
    };

    tracing_subscriber::registry().with(layer.with_filter(build_filter(verbose)))
}

fn build_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbose)))
}

/// Default filter directive for a `-v` count.
fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
