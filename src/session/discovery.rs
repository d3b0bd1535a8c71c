// src/session/discovery.rs

//! Feed discovery: run the helper for a page URL and collect its feeds.
//!
//! The dialog state lives on the UI thread. A search clears the side-channel
//! feed file, locates and runs the helper on a worker ([`run_discovery`]),
//! and turns the outcome into a status message plus a feed list. A new search
//! supersedes the previous one: its handle is discarded, so a late result
//! from the old helper run is dropped instead of overwriting the new state.
//! Helper runs take [`Services::helper_lock`], so the old run is done with
//! the feed file before the new run clears it.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError};

use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::engine::{Lifecycle, LifecycleGuard, TaskHandle, TaskId, TaskResult};
use crate::errors::{FeedbridgeError, Result};
use crate::exec::ProcessRunner;
use crate::fs::FileSystem;
use crate::locate::Locator;
use crate::net::FetchResponse;
use crate::types::UserMessage;

use super::feeds_file::{clear_feeds_file, read_feeds_file, resolve_feeds_path, DiscoveredFeedSet};
use super::messages::{
    count_reported_feeds, feeds_summary, helper_failed, launch_failed, reported_feeds,
};
use super::{Select, Services};

const EMPTY_QUERY: &str = "Enter a page URL to search for feeds.";

/// Inputs for one helper run, captured on the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRequest {
    pub helper_name: String,
    pub query_flag: String,
    pub query: String,
    pub feeds_file: Option<PathBuf>,
}

impl DiscoveryRequest {
    pub fn from_config(cfg: &ConfigFile, query: &str) -> Self {
        Self {
            helper_name: cfg.helper.name.clone(),
            query_flag: cfg.helper.query_flag.clone(),
            query: query.to_string(),
            feeds_file: resolve_feeds_path(cfg),
        }
    }

    /// `--query <url>`
    pub fn args(&self) -> Vec<String> {
        vec![self.query_flag.clone(), self.query.clone()]
    }
}

/// What a helper run produced. Every variant is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    Completed {
        /// Number of `Found feed:` lines on stdout.
        reported: usize,
        feeds: DiscoveredFeedSet,
    },
    HelperFailed {
        status: i32,
        stderr: String,
    },
    LaunchFailed {
        cause: String,
    },
}

impl DiscoveryOutcome {
    pub fn message(&self, helper_name: &str) -> UserMessage {
        match self {
            DiscoveryOutcome::Completed { reported, .. } => feeds_summary(*reported),
            DiscoveryOutcome::HelperFailed { status, stderr } => {
                helper_failed(helper_name, *status, stderr)
            }
            DiscoveryOutcome::LaunchFailed { cause } => launch_failed(helper_name, cause),
        }
    }
}

/// Worker side of a search. Blocks on the helper process.
///
/// The feed file is removed before the helper starts and read only after a
/// successful exit. If the helper wrote no file, the URLs from its
/// `Found feed:` lines are used instead.
pub fn run_discovery(
    locator: &Locator,
    runner: &dyn ProcessRunner,
    fs: &dyn FileSystem,
    request: &DiscoveryRequest,
) -> anyhow::Result<DiscoveryOutcome> {
    if let Some(path) = &request.feeds_file {
        clear_feeds_file(fs, path)?;
    }

    let helper = locator.locate(&request.helper_name);
    let result = match runner.run(&helper, &request.args()) {
        Ok(result) => result,
        Err(FeedbridgeError::Launch { program, source }) => {
            warn!(program = %program, error = %source, "helper could not be launched");
            return Ok(DiscoveryOutcome::LaunchFailed {
                cause: source.to_string(),
            });
        }
        Err(other) => return Err(other.into()),
    };

    if !result.success() {
        return Ok(DiscoveryOutcome::HelperFailed {
            status: result.exit_status,
            stderr: result.stderr_lossy(),
        });
    }

    let stdout = result.stdout_lossy();
    let reported = count_reported_feeds(&stdout);
    let mut feeds = match &request.feeds_file {
        Some(path) => read_feeds_file(fs, path)?,
        None => DiscoveredFeedSet::default(),
    };
    if feeds.is_empty() {
        feeds = DiscoveredFeedSet::from(reported_feeds(&stdout));
    }

    info!(query = %request.query, reported, feeds = feeds.len(), "discovery finished");
    Ok(DiscoveryOutcome::Completed { reported, feeds })
}

/// UI-side state of the feed discovery dialog.
#[derive(Debug)]
pub struct DiscoveryDialog {
    lifecycle: Lifecycle,
    query: String,
    busy: bool,
    status: Option<UserMessage>,
    feeds: DiscoveredFeedSet,
    preview: Option<UserMessage>,
    search_task: Option<TaskHandle>,
    preview_task: Option<TaskHandle>,
}

impl DiscoveryDialog {
    pub fn open() -> Self {
        Self {
            lifecycle: Lifecycle::create(),
            query: String::new(),
            busy: false,
            status: None,
            feeds: DiscoveredFeedSet::default(),
            preview: None,
            search_task: None,
            preview_task: None,
        }
    }

    pub fn guard(&self) -> LifecycleGuard {
        self.lifecycle.guard()
    }

    pub fn generation(&self) -> u64 {
        self.lifecycle.generation()
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle.is_alive()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// A search is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn status(&self) -> Option<&UserMessage> {
        self.status.as_ref()
    }

    pub fn feeds(&self) -> &DiscoveredFeedSet {
        &self.feeds
    }

    pub fn preview(&self) -> Option<&UserMessage> {
        self.preview.as_ref()
    }

    pub fn is_previewing(&self) -> bool {
        self.preview_task.is_some()
    }

    /// Tear down: pending results become no-ops.
    pub fn close(&mut self) {
        self.lifecycle.invalidate();
        self.discard_tasks();
        self.busy = false;
    }

    /// Start a helper run for `query`, superseding any running search.
    ///
    /// A blank query does not start anything; it only sets a hint message.
    pub fn search<S: 'static>(
        &mut self,
        services: &Services<S>,
        query: &str,
        select: Select<S, DiscoveryDialog>,
    ) -> Result<Option<TaskId>> {
        let query = query.trim();
        self.query = query.to_string();
        self.discard_tasks();
        self.feeds = DiscoveredFeedSet::default();
        self.preview = None;

        if query.is_empty() {
            self.busy = false;
            self.status = Some(UserMessage::info(EMPTY_QUERY));
            return Ok(None);
        }

        let request = DiscoveryRequest::from_config(&services.config, query);
        let helper_name = request.helper_name.clone();
        let locator = services.locator.clone();
        let runner = Arc::clone(&services.runner);
        let fs = Arc::clone(&services.fs);
        let helper_lock = Arc::clone(&services.helper_lock);

        let submitted = services.executor.submit(
            &self.guard(),
            move || {
                // The lock guards no data, so a poisoned one is still usable.
                let _turn = helper_lock.lock().unwrap_or_else(PoisonError::into_inner);
                run_discovery(&locator, runner.as_ref(), fs.as_ref(), &request)
            },
            move |ui: &mut S, result| {
                if let Some(dialog) = select(ui) {
                    dialog.finish_search(&helper_name, result);
                }
            },
        );

        match submitted {
            Ok(handle) => {
                let id = handle.id();
                debug!(task_id = id, session = self.generation(), query, "search submitted");
                self.busy = true;
                self.status = None;
                self.search_task = Some(handle);
                Ok(Some(id))
            }
            Err(err) => {
                self.busy = false;
                self.status = Some(UserMessage::error(format!("Feed discovery failed: {err}")));
                Err(err)
            }
        }
    }

    /// Fetch the first discovered feed on a worker and report its size.
    ///
    /// Returns `Ok(None)` when there is nothing to preview.
    pub fn preview_first<S: 'static>(
        &mut self,
        services: &Services<S>,
        select: Select<S, DiscoveryDialog>,
    ) -> Result<Option<TaskId>> {
        let Some(url) = self.feeds.first().map(str::to_string) else {
            return Ok(None);
        };
        self.preview_feed(services, &url, select).map(Some)
    }

    pub fn preview_feed<S: 'static>(
        &mut self,
        services: &Services<S>,
        url: &str,
        select: Select<S, DiscoveryDialog>,
    ) -> Result<TaskId> {
        if let Some(previous) = self.preview_task.take() {
            previous.discard();
        }
        self.preview = None;

        let fetcher = Arc::clone(&services.fetcher);
        let target = url.to_string();
        let shown = url.to_string();

        let handle = services.executor.submit(
            &self.guard(),
            move || Ok(fetcher.fetch(&target)?),
            move |ui: &mut S, result| {
                if let Some(dialog) = select(ui) {
                    dialog.finish_preview(&shown, result);
                }
            },
        )?;

        let id = handle.id();
        self.preview_task = Some(handle);
        Ok(id)
    }

    fn finish_search(&mut self, helper_name: &str, result: TaskResult<DiscoveryOutcome>) {
        self.busy = false;
        self.search_task = None;

        match result {
            Ok(outcome) => {
                self.status = Some(outcome.message(helper_name));
                if let DiscoveryOutcome::Completed { feeds, .. } = outcome {
                    self.feeds = feeds;
                }
            }
            Err(err) => {
                self.status = Some(UserMessage::error(format!("Feed discovery failed: {err}")));
            }
        }
    }

    fn finish_preview(&mut self, url: &str, result: TaskResult<FetchResponse>) {
        self.preview_task = None;
        self.preview = Some(match result {
            Ok(response) if response.is_success() => {
                UserMessage::info(format!("Fetched {} bytes from {url}", response.body.len()))
            }
            Ok(response) => UserMessage::error(format!("{url} returned HTTP {}", response.status)),
            Err(err) => UserMessage::error(format!("Could not fetch {url}: {err}")),
        });
    }

    fn discard_tasks(&mut self) {
        for handle in [self.search_task.take(), self.preview_task.take()].into_iter().flatten() {
            handle.discard();
        }
    }
}

impl Default for DiscoveryDialog {
    fn default() -> Self {
        Self::open()
    }
}
