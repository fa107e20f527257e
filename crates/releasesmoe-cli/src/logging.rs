//! Diagnostic logging to stderr
//!
//! Stdout carries result rows only, so every log line goes to stderr.
//! Default level is `warn`, which leaves just the connection errors;
//! `RUST_LOG` overrides the filter.

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directives used when `RUST_LOG` is unset
fn default_directives(verbose: bool) -> String {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    format!("releasesmoe={level},releasesmoe_core={level},hyper=warn,reqwest=warn,h2=warn")
}

/// Initialize the global subscriber
pub fn init(verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
