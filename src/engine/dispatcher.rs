// src/engine/dispatcher.rs

//! Single-threaded UI loop and the `post(closure)` interface into it.
//!
//! All UI-owned state `S` lives inside a [`UiLoop<S>`]. The only way for other
//! threads to affect it is to post a [`UiJob<S>`] through a [`Dispatcher`];
//! the loop then runs posted jobs one at a time, in posting order, with
//! `&mut S`. Worker threads therefore never hold a reference to UI state.
//!
//! The [`Dispatcher`] trait is the seam a real toolkit plugs into (an idle
//! callback or main-loop channel); [`LoopDispatcher`] is the implementation
//! backed by a Tokio unbounded channel.

use std::fmt;

use tokio::sync::mpsc;
use tracing::trace;

/// A closure to run on the UI thread.
pub type UiJob<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// Anything that can queue work for the UI thread.
pub trait Dispatcher<S>: Send + Sync {
    /// Queue `job`. Returns `false` if the UI loop is gone; the job is then
    /// dropped without running.
    fn post(&self, job: UiJob<S>) -> bool;
}

/// Channel-backed dispatcher handed out by [`UiLoop::dispatcher`].
pub struct LoopDispatcher<S> {
    tx: mpsc::UnboundedSender<UiJob<S>>,
}

impl<S> Clone for LoopDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<S> fmt::Debug for LoopDispatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopDispatcher")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<S: 'static> Dispatcher<S> for LoopDispatcher<S> {
    fn post(&self, job: UiJob<S>) -> bool {
        self.tx.send(job).is_ok()
    }
}

/// The UI thread's event loop.
///
/// Owns the UI state and drains posted jobs in FIFO order. It can be driven
/// synchronously from a toolkit's idle hook ([`UiLoop::run_pending`]) or as an
/// async loop ([`UiLoop::run_until`]).
pub struct UiLoop<S> {
    state: S,
    rx: mpsc::UnboundedReceiver<UiJob<S>>,
    tx: mpsc::UnboundedSender<UiJob<S>>,
    executed: u64,
}

impl<S> fmt::Debug for UiLoop<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiLoop")
            .field("executed", &self.executed)
            .finish_non_exhaustive()
    }
}

impl<S: 'static> UiLoop<S> {
    pub fn new(state: S) -> Self {
        Self::build(|_| state)
    }

    /// Construct the loop and its state together, for state that needs to
    /// hold a dispatcher into its own loop (services, executors, debouncers).
    pub fn build(make_state: impl FnOnce(LoopDispatcher<S>) -> S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = make_state(LoopDispatcher { tx: tx.clone() });
        Self {
            state,
            rx,
            tx,
            executed: 0,
        }
    }

    pub fn dispatcher(&self) -> LoopDispatcher<S> {
        LoopDispatcher {
            tx: self.tx.clone(),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Direct access for UI-thread event handlers (clicks, keystrokes).
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    /// Number of jobs run since the loop was created.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Run every job that is queued right now. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            self.run_job(job);
            ran += 1;
        }
        ran
    }

    /// Wait for and run jobs until `done` holds for the state.
    ///
    /// `done` is checked before waiting, so an already-satisfied condition
    /// returns immediately.
    pub async fn run_until(&mut self, mut done: impl FnMut(&S) -> bool) {
        while !done(&self.state) {
            match self.rx.recv().await {
                Some(job) => self.run_job(job),
                None => break,
            }
        }
    }

    fn run_job(&mut self, job: UiJob<S>) {
        self.executed += 1;
        trace!(job = self.executed, "running UI job");
        job(&mut self.state);
    }
}
