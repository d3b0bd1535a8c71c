// src/engine/debounce.rs

//! Coalesces bursts of input into one delayed UI action.
//!
//! Each [`Debouncer::trigger`] supersedes whatever was scheduled before it.
//! Cancellation happens in two layers:
//!
//! - the previous timer task is aborted, which covers the common case;
//! - every scheduled action carries a `pending_id`, and the job it posts
//!   compares that id with the latest one *on the UI thread* before running.
//!
//! The second layer is what makes cancellation race-free: a timer that fired
//! just before being superseded has already posted its job, but that job sees
//! a newer id and does nothing. `trigger` is meant to be called from the UI
//! thread, so the id bump and the check are serialized by the UI loop.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::errors::{Error, Result};

use super::dispatcher::Dispatcher;

/// Default input-inactivity window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Default)]
struct DebounceState {
    /// Id of the most recently scheduled (or cancelled) action.
    latest: AtomicU64,
    /// Id of the last action that ran or was cancelled.
    settled: AtomicU64,
}

pub struct Debouncer<S> {
    dispatcher: Arc<dyn Dispatcher<S>>,
    runtime: Handle,
    delay: Duration,
    state: Arc<DebounceState>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<S> fmt::Debug for Debouncer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("latest", &self.state.latest.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<S: 'static> Debouncer<S> {
    /// Create a debouncer whose timers run on the current Tokio runtime.
    pub fn new(dispatcher: Arc<dyn Dispatcher<S>>, delay: Duration) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| Error::new(e).context("debouncer needs a Tokio runtime"))?;
        Ok(Self::with_handle(dispatcher, runtime, delay))
    }

    pub fn with_handle(dispatcher: Arc<dyn Dispatcher<S>>, runtime: Handle, delay: Duration) -> Self {
        Self {
            dispatcher,
            runtime,
            delay,
            state: Arc::new(DebounceState::default()),
            timer: Mutex::new(None),
        }
    }

    /// The configured default window.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// [`Debouncer::trigger`] with the configured window.
    pub fn schedule<F>(&self, action: F) -> u64
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.trigger(self.delay, action)
    }

    /// Cancel any pending action and run `action` after `delay` of quiet.
    ///
    /// Returns the new action's `pending_id`.
    pub fn trigger<F>(&self, delay: Duration, action: F) -> u64
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        // Bump first: from here on, any job an older timer already posted is stale.
        let id = self.state.latest.fetch_add(1, Ordering::AcqRel) + 1;

        let mut timer = self.lock_timer();
        if let Some(previous) = timer.take() {
            previous.abort();
            trace!(pending_id = id - 1, "previous debounce timer aborted");
        }

        let dispatcher = Arc::clone(&self.dispatcher);
        let state = Arc::clone(&self.state);

        *timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let posted = dispatcher.post(Box::new(move |ui: &mut S| {
                if state.latest.load(Ordering::Acquire) != id {
                    trace!(pending_id = id, "superseded debounce action dropped");
                    return;
                }
                state.settled.store(id, Ordering::Release);
                debug!(pending_id = id, "debounced action running");
                action(ui);
            }));

            if !posted {
                debug!(pending_id = id, "UI loop gone; debounced action dropped");
            }
        }));

        trace!(pending_id = id, delay_ms = delay.as_millis() as u64, "debounce scheduled");
        id
    }

    /// Drop the pending action, if any.
    pub fn cancel(&self) {
        let id = self.state.latest.fetch_add(1, Ordering::AcqRel) + 1;
        self.state.settled.store(id, Ordering::Release);
        if let Some(previous) = self.lock_timer().take() {
            previous.abort();
            trace!(pending_id = id - 1, "debounce cancelled");
        }
    }

    /// Id of the scheduled action that has neither run nor been cancelled.
    pub fn pending_id(&self) -> Option<u64> {
        let latest = self.state.latest.load(Ordering::Acquire);
        let settled = self.state.settled.load(Ordering::Acquire);
        (latest != settled).then_some(latest)
    }

    pub fn is_pending(&self) -> bool {
        self.pending_id().is_some()
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> Drop for Debouncer<S> {
    fn drop(&mut self) {
        let id = self.state.latest.fetch_add(1, Ordering::AcqRel) + 1;
        self.state.settled.store(id, Ordering::Release);
        if let Some(timer) = self.timer.get_mut().unwrap_or_else(PoisonError::into_inner).take() {
            timer.abort();
        }
    }
}
