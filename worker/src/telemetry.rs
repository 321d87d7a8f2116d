//! Tracing subscriber setup

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use mc_shared::config::{LogFormat, LoggingConfig};

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => level_filter(&directives)?,
        _ => level_filter(&config.level)?,
    };

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let installed = match config.format {
        LogFormat::Json => tracing::subscriber::set_global_default(
            builder
                .with_ansi(false)
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .finish(),
        ),
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.pretty().finish()),
        LogFormat::Compact => tracing::subscriber::set_global_default(builder.compact().finish()),
    };

    installed.context("Failed to set subscriber")
}

/// Parse a level or filter directive list, e.g. `info,mc_infra=debug`
pub fn level_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .with_context(|| format!("Invalid log filter '{}'", directives))
}
