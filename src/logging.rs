//! Tracing subscriber setup. Logs go to stderr; stdout carries the
//! measurement stream.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `level` is an `EnvFilter` directive such as `debug` or
/// `beanwatch_collector=trace`; without one, `RUST_LOG` is used, then `info`.
pub fn init(level: Option<&str>) -> Result<()> {
    tracing_subscriber::registry()
        .with(filter(level)?)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to install the tracing subscriber")
}

fn filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(level) => {
            EnvFilter::try_new(level).with_context(|| format!("Invalid log level '{}'", level))
        }
        None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))),
    }
}
