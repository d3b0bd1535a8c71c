// src/lib.rs

pub mod app;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod locate;
pub mod logging;
pub mod net;
pub mod session;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::app::{build_ui_loop, Ui};
use crate::cli::{CliArgs, Command};
use crate::config::{load_effective, ConfigFile};
use crate::engine::UiLoop;
use crate::exec::RealProcessRunner;
use crate::fs::{FileSystem, RealFileSystem};
use crate::locate::Locator;
use crate::net::HttpFetcher;
use crate::session::resolve_feeds_path;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the UI loop and its state (services, dialogs)
/// - the real process runner, filesystem and HTTP fetcher
///
/// and then drives one dialog headlessly until it settles.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_effective(args.config.as_deref().map(Path::new))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    match args.command {
        Command::Locate => {
            let located = Locator::from_config(&cfg, fs).locate(&cfg.helper.name);
            println!("{located}");
            Ok(())
        }
        Command::Discover { query, preview } => {
            let mut ui_loop = real_ui_loop(cfg, fs);
            discover(&mut ui_loop, &query, preview).await
        }
        Command::Lookup { query } => {
            let mut ui_loop = real_ui_loop(cfg, fs);
            lookup(&mut ui_loop, &query).await
        }
    }
}

fn real_ui_loop(cfg: ConfigFile, fs: Arc<dyn FileSystem>) -> UiLoop<Ui> {
    let fetcher = Arc::new(HttpFetcher::new(cfg.lookup.timeout()));
    build_ui_loop(cfg, Arc::new(RealProcessRunner), fs, fetcher)
}

async fn discover(ui_loop: &mut UiLoop<Ui>, query: &str, preview: bool) -> Result<()> {
    let ui = ui_loop.state_mut();
    ui.open_discovery();
    if ui.search_feeds(query)?.is_some() {
        ui_loop
            .run_until(|ui| ui.discovery().is_some_and(|d| !d.is_busy()))
            .await;
    }

    let Some(dialog) = ui_loop.state().discovery() else {
        return Ok(());
    };
    if let Some(status) = dialog.status() {
        println!("{status}");
    }
    for url in dialog.feeds().urls() {
        println!("  {url}");
    }

    if preview && ui_loop.state_mut().preview_feed()?.is_some() {
        ui_loop
            .run_until(|ui| ui.discovery().is_some_and(|d| !d.is_previewing()))
            .await;
        if let Some(message) = ui_loop.state().discovery().and_then(|d| d.preview()) {
            println!("{message}");
        }
    }

    ui_loop.state_mut().close_discovery();
    info!(jobs = ui_loop.executed(), "discovery session finished");
    Ok(())
}

async fn lookup(ui_loop: &mut UiLoop<Ui>, query: &str) -> Result<()> {
    ui_loop.state_mut().open_lookup()?;

    // Simulate typing: every prefix is one keystroke.
    for (idx, ch) in query.char_indices() {
        ui_loop.state_mut().lookup_input(&query[..idx + ch.len_utf8()]);
    }
    if query.trim().is_empty() {
        ui_loop.state_mut().lookup_input(query);
    }

    ui_loop
        .run_until(|ui| ui.lookup().is_none_or(|d| d.is_settled()))
        .await;

    if let Some(dialog) = ui_loop.state().lookup() {
        debug!(lookups = dialog.lookups_started(), "lookup settled");
        match (dialog.mapping(), dialog.message()) {
            (Some(mapping), _) => println!("{mapping}"),
            (None, Some(message)) => println!("{message}"),
            (None, None) => {}
        }
    }

    ui_loop.state_mut().close_lookup();
    Ok(())
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile) {
    println!("feedbridge dry-run");
    println!("  app.name = {}", cfg.app.name);
    println!("  helper.name = {}", cfg.helper.name);
    println!("  helper.query_flag = {}", cfg.helper.query_flag);
    match resolve_feeds_path(cfg) {
        Some(path) => println!("  helper.feeds_file = {}", path.display()),
        None => println!("  helper.feeds_file = (no user config dir)"),
    }
    println!();

    println!("locator:");
    for template in &cfg.locator.dev_tree {
        println!("  dev_tree: {template}");
    }
    if let Some(ref output) = cfg.locator.build_output {
        println!("  build_output: {output}");
    }
    if let Some(ref bindir) = cfg.locator.install_bindir {
        println!("  install_bindir: {}", bindir.display());
    }
    for dir in &cfg.locator.system_dirs {
        println!("  system_dir: {}", dir.display());
    }
    println!();

    println!("debounce.delay_ms = {}", cfg.debounce.delay_ms);
    println!("lookup.source = {:?}", cfg.lookup.source);
    if let Some(ref url) = cfg.lookup.url {
        println!("lookup.url = {url}");
    }
    println!("lookup.timeout_ms = {}", cfg.lookup.timeout_ms);
    if !cfg.lookup.table.is_empty() {
        println!("lookup.table ({}):", cfg.lookup.table.len());
        for (code, mapping) in &cfg.lookup.table {
            println!("  {code} = {mapping}");
        }
    }

    debug!("dry-run complete (no execution)");
}
