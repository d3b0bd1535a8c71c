// src/session/lookup.rs

//! Debounced lookup: typed input → mapping, off the UI thread.
//!
//! Keystrokes go through a [`Debouncer`]; only the last one in a burst starts
//! a lookup on a worker. An empty result is a legitimate miss, shown as
//! [`NO_MAPPING`](super::messages::NO_MAPPING) with the confirm action left
//! disabled.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use tracing::{debug, trace};
use url::form_urlencoded;

use crate::config::ConfigFile;
use crate::engine::{Debouncer, Lifecycle, LifecycleGuard, TaskHandle, TaskId, TaskResult};
use crate::errors::{FeedbridgeError, Result};
use crate::net::Fetcher;
use crate::types::{LookupSourceKind, UserMessage};

use super::messages::no_mapping;
use super::{Select, Services};

/// Resolves a query to a mapping. Blocking; called on worker threads.
///
/// `Ok("")` means "no mapping"; `Err` is reserved for real failures.
pub trait LookupSource: Send + Sync + Debug {
    fn lookup(&self, query: &str) -> Result<String>;
}

/// Mapping from the `[lookup.table]` config section.
#[derive(Debug, Clone, Default)]
pub struct TableLookup {
    table: BTreeMap<String, String>,
}

impl TableLookup {
    pub fn new(table: BTreeMap<String, String>) -> Self {
        Self { table }
    }
}

impl LookupSource for TableLookup {
    fn lookup(&self, query: &str) -> Result<String> {
        Ok(self.table.get(query.trim()).cloned().unwrap_or_default())
    }
}

/// GET against a URL template with `{query}` substituted, percent-encoded.
///
/// The trimmed response body is the mapping. HTTP 404 is a miss.
#[derive(Debug, Clone)]
pub struct HttpLookup {
    fetcher: Arc<dyn Fetcher>,
    url_template: String,
}

impl HttpLookup {
    pub fn new(fetcher: Arc<dyn Fetcher>, url_template: impl Into<String>) -> Self {
        Self {
            fetcher,
            url_template: url_template.into(),
        }
    }

    pub fn url_for(&self, query: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(query.trim().as_bytes()).collect();
        self.url_template.replace("{query}", &encoded)
    }
}

impl LookupSource for HttpLookup {
    fn lookup(&self, query: &str) -> Result<String> {
        let url = self.url_for(query);
        let response = self.fetcher.fetch(&url)?;
        match response.status {
            404 => Ok(String::new()),
            _ if response.is_success() => Ok(response.text_lossy().trim().to_string()),
            status => Err(FeedbridgeError::Fetch(format!("GET {url}: HTTP {status}"))),
        }
    }
}

pub fn lookup_source_from_config(cfg: &ConfigFile, fetcher: Arc<dyn Fetcher>) -> Arc<dyn LookupSource> {
    match (cfg.lookup.source, &cfg.lookup.url) {
        (LookupSourceKind::Http, Some(url)) => Arc::new(HttpLookup::new(fetcher, url.clone())),
        _ => Arc::new(TableLookup::new(cfg.lookup.table.clone())),
    }
}

/// UI-side state of the lookup dialog.
pub struct LookupDialog<S> {
    lifecycle: Lifecycle,
    debouncer: Debouncer<S>,
    input: String,
    mapping: Option<String>,
    message: Option<UserMessage>,
    busy: bool,
    task: Option<TaskHandle>,
    lookups: u64,
}

impl<S> Debug for LookupDialog<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupDialog")
            .field("session", &self.lifecycle.generation())
            .field("input", &self.input)
            .field("mapping", &self.mapping)
            .field("busy", &self.busy)
            .finish_non_exhaustive()
    }
}

impl<S: 'static> LookupDialog<S> {
    /// Needs a Tokio runtime for the debounce timers.
    pub fn open(services: &Services<S>) -> Result<Self> {
        let debouncer = Debouncer::new(
            services.executor.router().dispatcher(),
            services.config.debounce.delay(),
        )?;
        Ok(Self {
            lifecycle: Lifecycle::create(),
            debouncer,
            input: String::new(),
            mapping: None,
            message: None,
            busy: false,
            task: None,
            lookups: 0,
        })
    }

    pub fn guard(&self) -> LifecycleGuard {
        self.lifecycle.guard()
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle.is_alive()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn mapping(&self) -> Option<&str> {
        self.mapping.as_deref()
    }

    pub fn message(&self) -> Option<&UserMessage> {
        self.message.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Number of lookups actually started (after debouncing).
    pub fn lookups_started(&self) -> u64 {
        self.lookups
    }

    /// Only a non-empty mapping can be confirmed.
    pub fn confirm_enabled(&self) -> bool {
        self.mapping.is_some()
    }

    /// No keystroke waiting and no lookup in flight.
    pub fn is_settled(&self) -> bool {
        !self.busy && !self.debouncer.is_pending()
    }

    /// The mapping to apply, if confirming is allowed.
    pub fn confirm(&self) -> Option<&str> {
        self.mapping()
    }

    /// Handle a keystroke: supersede pending and in-flight work, then
    /// schedule a lookup after the quiet period. Empty input only clears.
    pub fn input_changed(
        &mut self,
        services: &Arc<Services<S>>,
        text: &str,
        select: Select<S, LookupDialog<S>>,
    ) {
        self.input = text.to_string();
        self.mapping = None;
        self.message = None;
        self.busy = false;
        if let Some(task) = self.task.take() {
            task.discard();
        }

        let query = text.trim().to_string();
        if query.is_empty() {
            self.debouncer.cancel();
            trace!(session = self.lifecycle.generation(), "lookup input cleared");
            return;
        }

        let guard = self.guard();
        let services = Arc::clone(services);
        self.debouncer.schedule(move |ui: &mut S| {
            if !guard.is_alive() {
                return;
            }
            if let Some(dialog) = select(ui) {
                dialog.start_lookup(&services, query, select);
            }
        });
    }

    pub fn close(&mut self) {
        self.lifecycle.invalidate();
        self.debouncer.cancel();
        if let Some(task) = self.task.take() {
            task.discard();
        }
        self.busy = false;
    }

    fn start_lookup(
        &mut self,
        services: &Services<S>,
        query: String,
        select: Select<S, LookupDialog<S>>,
    ) -> Option<TaskId> {
        let source = Arc::clone(&services.lookup);
        let worker_query = query.clone();

        let submitted = services.executor.submit(
            &self.guard(),
            move || Ok(source.lookup(&worker_query)?),
            move |ui: &mut S, result| {
                if let Some(dialog) = select(ui) {
                    dialog.finish_lookup(&query, result);
                }
            },
        );

        match submitted {
            Ok(handle) => {
                let id = handle.id();
                self.lookups += 1;
                self.busy = true;
                self.task = Some(handle);
                debug!(task_id = id, session = self.lifecycle.generation(), "lookup submitted");
                Some(id)
            }
            Err(err) => {
                self.message = Some(UserMessage::error(format!("Lookup failed: {err}")));
                None
            }
        }
    }

    fn finish_lookup(&mut self, query: &str, result: TaskResult<String>) {
        self.busy = false;
        self.task = None;

        match result {
            Ok(mapping) if mapping.trim().is_empty() => {
                debug!(query, "no mapping");
                self.mapping = None;
                self.message = Some(no_mapping());
            }
            Ok(mapping) => {
                self.mapping = Some(mapping.trim().to_string());
                self.message = None;
            }
            Err(err) => {
                self.mapping = None;
                self.message = Some(UserMessage::error(format!("Lookup failed: {err}")));
            }
        }
    }
}
