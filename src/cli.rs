// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `feedbridge`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "feedbridge",
    version,
    about = "Discover feeds and resolve local mappings through a helper process.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `<user-config-dir>/feedbridge/config.toml`; a missing default
    /// file means built-in defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FEEDBRIDGE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load + validate the config, print it, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Ask the helper to discover feeds for a page URL.
    Discover {
        /// Page URL or search string handed to the helper.
        query: String,

        /// Fetch the first discovered feed and report its size.
        #[arg(long)]
        preview: bool,
    },
    /// Resolve a code (e.g. a ZIP code) through the configured lookup source.
    Lookup {
        query: String,
    },
    /// Print where the helper binary resolves to.
    Locate,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
