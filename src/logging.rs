//! Logging initialization for postbox.
//!
//! The crate ships no binary of its own, so the embedding server calls
//! [`init`] once at startup with its `[logging]` config section. Events
//! from the deposit and mailbox paths then land on stdout and in the
//! configured log file.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{PostboxError, Result};

/// Parse a configured level name, falling back to INFO.
fn parse_level(level: &str) -> Level {
    // "warning" is accepted as an alias that Level's own parser lacks
    if level.eq_ignore_ascii_case("warning") {
        return Level::WARN;
    }
    level.parse().unwrap_or(Level::INFO)
}

/// Install the global subscriber, writing to stdout and the configured
/// log file. Missing parent directories of the file are created.
///
/// Returns `Config` when a subscriber is already installed, so a second
/// call fails instead of panicking.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if let Some(parent) = Path::new(&config.file).parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let log_file = Arc::new(File::create(&config.file)?);

    let filter = EnvFilter::from_default_env().add_directive(parse_level(&config.level).into());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout.and(log_file))
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .with(filter)
        .try_init()
        .map_err(|e| PostboxError::Config(format!("logging init failed: {e}")))
}
