// src/engine/lifecycle.rs

//! Liveness tracking for UI sessions (dialogs) that own asynchronous work.
//!
//! A [`Lifecycle`] is created when a session opens and owned by that session.
//! It hands out [`LifecycleGuard`] clones to every callback that will re-enter
//! the UI thread later. Only the owner can flip the flag; guards can only read
//! it. The flip is one-way (alive → dead) and happens at most once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::debug;

/// Source of per-session generation numbers, used to tell sessions apart in
/// logs and in routed callbacks.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct GuardState {
    alive: AtomicBool,
    generation: u64,
}

/// Owner side of a session's liveness flag.
///
/// Not `Clone`: there is exactly one owner. Dropping it invalidates the
/// session, so a dialog that is simply dropped still cancels its callbacks.
#[derive(Debug)]
pub struct Lifecycle {
    state: Arc<GuardState>,
}

impl Lifecycle {
    pub fn create() -> Self {
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        debug!(session = generation, "session lifecycle created");
        Self {
            state: Arc::new(GuardState {
                alive: AtomicBool::new(true),
                generation,
            }),
        }
    }

    /// A read-only handle for callbacks to capture.
    pub fn guard(&self) -> LifecycleGuard {
        LifecycleGuard {
            state: Arc::clone(&self.state),
        }
    }

    /// Mark the session as torn down.
    ///
    /// Idempotent. Returns `true` only for the call that performed the
    /// transition.
    pub fn invalidate(&self) -> bool {
        let was_alive = self.state.alive.swap(false, Ordering::AcqRel);
        if was_alive {
            debug!(session = self.state.generation, "session lifecycle invalidated");
        }
        was_alive
    }

    pub fn is_alive(&self) -> bool {
        self.state.alive.load(Ordering::Acquire)
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        self.invalidate();
    }
}

/// Read-only view of a session's liveness, safe to send across threads.
#[derive(Debug, Clone)]
pub struct LifecycleGuard {
    state: Arc<GuardState>,
}

impl LifecycleGuard {
    /// Check this immediately before touching UI state.
    pub fn is_alive(&self) -> bool {
        self.state.alive.load(Ordering::Acquire)
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }
}
