// src/engine/router.rs

//! The single chokepoint through which background results re-enter the UI
//! thread.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::dispatcher::Dispatcher;
use super::lifecycle::LifecycleGuard;

/// Wraps results into guarded UI jobs and posts them.
pub struct ResultRouter<S> {
    dispatcher: Arc<dyn Dispatcher<S>>,
}

impl<S> Clone for ResultRouter<S> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl<S> fmt::Debug for ResultRouter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultRouter").finish_non_exhaustive()
    }
}

impl<S: 'static> ResultRouter<S> {
    pub fn new(dispatcher: Arc<dyn Dispatcher<S>>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> Arc<dyn Dispatcher<S>> {
        Arc::clone(&self.dispatcher)
    }

    /// Post `apply(ui, value)` to the UI thread, gated on `guard`.
    ///
    /// The liveness check is the first thing the job does once it runs. If
    /// the owning session has been torn down by then, the job is a no-op.
    /// Returns `false` if the UI loop itself is gone.
    pub fn route<T, F>(&self, guard: &LifecycleGuard, value: T, apply: F) -> bool
    where
        T: Send + 'static,
        F: FnOnce(&mut S, T) + Send + 'static,
    {
        let guard = guard.clone();
        let session = guard.generation();

        let posted = self.dispatcher.post(Box::new(move |ui: &mut S| {
            if !guard.is_alive() {
                trace!(session = guard.generation(), "session closed; dropping routed result");
                return;
            }
            apply(ui, value);
        }));

        if !posted {
            debug!(session, "UI loop has shut down; routed result dropped");
        }
        posted
    }
}
