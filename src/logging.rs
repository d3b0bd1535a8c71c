// src/logging.rs

//! Logging setup for `feedbridge` using `tracing` + `tracing-subscriber`.
//!
//! The filter comes from, in order:
//! 1. the `--log-level` CLI flag, applied to every target
//! 2. the `FEEDBRIDGE_LOG` environment variable, in `EnvFilter` directive
//!    syntax (`debug`, `feedbridge::engine=trace,info`, ...)
//! 3. `info`
//!
//! Logs go to STDERR; stdout carries the user-facing messages.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "FEEDBRIDGE_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(cli_level, env.as_deref());

    // Thread names matter here: worker threads are named after their task id.
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Resolve the effective filter. A malformed env value falls back to `info`
/// with a note on stderr, since the subscriber is not up yet.
pub fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(directive_for(level));
    }

    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::builder().parse(directives).unwrap_or_else(|err| {
            eprintln!("feedbridge: ignoring {LOG_ENV_VAR}={directives:?}: {err}");
            EnvFilter::new(DEFAULT_DIRECTIVE)
        }),
        None => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}

fn directive_for(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
