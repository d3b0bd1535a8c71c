// src/session/mod.rs

//! Dialog sessions built on the coordination layer.
//!
//! A session is UI-owned state with its own [`Lifecycle`]: the discovery
//! dialog runs the feed helper, the lookup dialog resolves typed queries.
//! Sessions never touch the host's state directly; they are reached through a
//! [`Select`] function so the same code serves any UI state type.
//!
//! [`Lifecycle`]: crate::engine::Lifecycle

pub mod discovery;
pub mod feeds_file;
pub mod lookup;
pub mod messages;

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::config::ConfigFile;
use crate::engine::{Dispatcher, ResultRouter, TaskExecutor};
use crate::exec::ProcessRunner;
use crate::fs::FileSystem;
use crate::locate::Locator;
use crate::net::Fetcher;

pub use discovery::{run_discovery, DiscoveryDialog, DiscoveryOutcome, DiscoveryRequest};
pub use feeds_file::{
    clear_feeds_file, default_feeds_path, read_feeds_file, resolve_feeds_path, write_feeds_file,
    DiscoveredFeedSet, FEEDS_FILE_NAME,
};
pub use lookup::{lookup_source_from_config, HttpLookup, LookupDialog, LookupSource, TableLookup};
pub use messages::NO_MAPPING;

/// Finds a session inside the UI state; `None` once it has been closed.
pub type Select<S, D> = fn(&mut S) -> Option<&mut D>;

/// Everything sessions need to start background work.
///
/// Shared behind an `Arc`; worker closures clone the pieces they use.
pub struct Services<S> {
    pub config: ConfigFile,
    pub executor: TaskExecutor<S>,
    pub runner: Arc<dyn ProcessRunner>,
    pub fs: Arc<dyn FileSystem>,
    pub fetcher: Arc<dyn Fetcher>,
    pub lookup: Arc<dyn LookupSource>,
    pub locator: Locator,
    /// Held by a worker for its whole clear → run → read of the feed file.
    /// The file path is shared, so a superseded helper run must finish
    /// before the next one starts.
    pub helper_lock: Arc<Mutex<()>>,
}

impl<S> fmt::Debug for Services<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("helper", &self.config.helper.name)
            .field("runner", &self.runner)
            .field("lookup", &self.lookup)
            .finish_non_exhaustive()
    }
}

impl<S: 'static> Services<S> {
    pub fn new(
        config: ConfigFile,
        dispatcher: Arc<dyn Dispatcher<S>>,
        runner: Arc<dyn ProcessRunner>,
        fs: Arc<dyn FileSystem>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        let lookup = lookup_source_from_config(&config, Arc::clone(&fetcher));
        Self::with_lookup(config, dispatcher, runner, fs, fetcher, lookup)
    }

    pub fn with_lookup(
        config: ConfigFile,
        dispatcher: Arc<dyn Dispatcher<S>>,
        runner: Arc<dyn ProcessRunner>,
        fs: Arc<dyn FileSystem>,
        fetcher: Arc<dyn Fetcher>,
        lookup: Arc<dyn LookupSource>,
    ) -> Self {
        let executor = TaskExecutor::new(ResultRouter::new(dispatcher));
        let locator = Locator::from_config(&config, Arc::clone(&fs));
        Self {
            config,
            executor,
            runner,
            fs,
            fetcher,
            lookup,
            locator,
            helper_lock: Arc::new(Mutex::new(())),
        }
    }
}
