// src/app/mod.rs

//! Application UI state.
//!
//! [`Ui`] is the state type the UI loop owns. It holds the shared
//! [`Services`] and at most one of each dialog. Opening a dialog gives it a
//! fresh lifecycle; closing it invalidates that lifecycle before the dialog
//! is dropped, so results still in flight for it become no-ops.

use std::sync::Arc;

use tracing::debug;

use crate::config::ConfigFile;
use crate::engine::{TaskId, UiLoop};
use crate::errors::Result;
use crate::exec::ProcessRunner;
use crate::fs::FileSystem;
use crate::net::Fetcher;
use crate::session::{DiscoveryDialog, LookupDialog, Services};

pub struct Ui {
    services: Arc<Services<Ui>>,
    discovery: Option<DiscoveryDialog>,
    lookup: Option<LookupDialog<Ui>>,
}

impl std::fmt::Debug for Ui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ui")
            .field("discovery", &self.discovery)
            .field("lookup", &self.lookup)
            .finish_non_exhaustive()
    }
}

/// Build the UI loop with its state wired to the loop's own dispatcher.
pub fn build_ui_loop(
    config: ConfigFile,
    runner: Arc<dyn ProcessRunner>,
    fs: Arc<dyn FileSystem>,
    fetcher: Arc<dyn Fetcher>,
) -> UiLoop<Ui> {
    UiLoop::build(|dispatcher| {
        Ui::new(Arc::new(Services::new(config, Arc::new(dispatcher), runner, fs, fetcher)))
    })
}

fn discovery_of(ui: &mut Ui) -> Option<&mut DiscoveryDialog> {
    ui.discovery.as_mut()
}

fn lookup_of(ui: &mut Ui) -> Option<&mut LookupDialog<Ui>> {
    ui.lookup.as_mut()
}

impl Ui {
    pub fn new(services: Arc<Services<Ui>>) -> Self {
        Self {
            services,
            discovery: None,
            lookup: None,
        }
    }

    pub fn services(&self) -> &Arc<Services<Ui>> {
        &self.services
    }

    pub fn discovery(&self) -> Option<&DiscoveryDialog> {
        self.discovery.as_ref()
    }

    pub fn lookup(&self) -> Option<&LookupDialog<Ui>> {
        self.lookup.as_ref()
    }

    /// Open the discovery dialog, replacing any open one.
    pub fn open_discovery(&mut self) -> &mut DiscoveryDialog {
        self.close_discovery();
        let dialog = DiscoveryDialog::open();
        debug!(session = dialog.generation(), "discovery dialog opened");
        self.discovery.insert(dialog)
    }

    pub fn close_discovery(&mut self) {
        if let Some(mut dialog) = self.discovery.take() {
            dialog.close();
            debug!(session = dialog.generation(), "discovery dialog closed");
        }
    }

    /// Start a search in the open discovery dialog. `Ok(None)` if no dialog
    /// is open or the query is blank.
    pub fn search_feeds(&mut self, query: &str) -> Result<Option<TaskId>> {
        let services = Arc::clone(&self.services);
        match self.discovery.as_mut() {
            Some(dialog) => dialog.search(&services, query, discovery_of),
            None => Ok(None),
        }
    }

    /// Preview the first discovered feed. `Ok(None)` if there is nothing to
    /// preview.
    pub fn preview_feed(&mut self) -> Result<Option<TaskId>> {
        let services = Arc::clone(&self.services);
        match self.discovery.as_mut() {
            Some(dialog) => dialog.preview_first(&services, discovery_of),
            None => Ok(None),
        }
    }

    /// Open the lookup dialog, replacing any open one. Needs a Tokio runtime.
    pub fn open_lookup(&mut self) -> Result<&mut LookupDialog<Ui>> {
        self.close_lookup();
        let dialog = LookupDialog::open(&self.services)?;
        debug!("lookup dialog opened");
        Ok(self.lookup.insert(dialog))
    }

    pub fn close_lookup(&mut self) {
        if let Some(mut dialog) = self.lookup.take() {
            dialog.close();
            debug!("lookup dialog closed");
        }
    }

    /// Feed one keystroke's worth of input to the lookup dialog.
    pub fn lookup_input(&mut self, text: &str) {
        let services = Arc::clone(&self.services);
        if let Some(dialog) = self.lookup.as_mut() {
            dialog.input_changed(&services, text, lookup_of);
        }
    }
}
