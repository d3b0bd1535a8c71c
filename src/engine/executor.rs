// src/engine/executor.rs

//! Runs blocking work on dedicated worker threads.
//!
//! Every [`TaskExecutor::submit`] call gets its own OS thread; there is no
//! pool and no queueing between submissions. The work function's outcome
//! (including a panic) is turned into a [`TaskResult`] on the worker and then
//! handed to the [`ResultRouter`], which runs the completion callback on the
//! UI thread. The callback never runs on the worker.

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::errors::{FeedbridgeError, Result};

use super::lifecycle::LifecycleGuard;
use super::router::ResultRouter;

pub type TaskId = u64;

/// Failure of a work function, caught at the worker boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The work function returned an error; carries the full context chain.
    #[error("{0}")]
    Failed(String),
    #[error("worker panicked: {0}")]
    Panicked(String),
}

pub type TaskResult<T> = std::result::Result<T, TaskError>;

/// Caller-side handle for one submitted task.
///
/// The worker thread cannot be interrupted mid-call; [`TaskHandle::discard`]
/// instead marks its eventual result to be dropped on arrival. Dropping the
/// handle detaches the worker and leaves the result live.
pub struct TaskHandle {
    id: TaskId,
    discarded: Arc<AtomicBool>,
    join: Option<thread::JoinHandle<()>>,
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("discarded", &self.is_discarded())
            .field("finished", &self.is_finished())
            .finish()
    }
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Drop the result when it arrives instead of applying it.
    pub fn discard(&self) {
        if !self.discarded.swap(true, Ordering::AcqRel) {
            debug!(task_id = self.id, "task result will be discarded");
        }
    }

    pub fn is_discarded(&self) -> bool {
        self.discarded.load(Ordering::Acquire)
    }

    /// Whether the worker thread has exited (its result is then posted).
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(|j| j.is_finished())
    }

    /// Block until the worker thread exits. Never call this on the UI thread.
    ///
    /// Returns `false` if the worker thread itself panicked outside the
    /// guarded work function.
    pub fn join(mut self) -> bool {
        match self.join.take() {
            Some(handle) => handle.join().is_ok(),
            None => true,
        }
    }
}

/// Spawns one worker per submission and routes results back to the UI.
pub struct TaskExecutor<S> {
    router: ResultRouter<S>,
    next_id: Arc<AtomicU64>,
}

impl<S> Clone for TaskExecutor<S> {
    fn clone(&self) -> Self {
        Self {
            router: self.router.clone(),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<S> fmt::Debug for TaskExecutor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskExecutor")
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}

impl<S: 'static> TaskExecutor<S> {
    pub fn new(router: ResultRouter<S>) -> Self {
        Self {
            router,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn router(&self) -> &ResultRouter<S> {
        &self.router
    }

    /// Run `work` on a new worker thread, then `on_result` on the UI thread.
    ///
    /// `on_result` only runs if `guard` is still alive and the returned
    /// handle has not been discarded by the time the UI loop picks it up.
    /// The only error is failing to spawn the thread.
    pub fn submit<T, W, R>(&self, guard: &LifecycleGuard, work: W, on_result: R) -> Result<TaskHandle>
    where
        T: Send + 'static,
        W: FnOnce() -> anyhow::Result<T> + Send + 'static,
        R: FnOnce(&mut S, TaskResult<T>) + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let discarded = Arc::new(AtomicBool::new(false));

        let router = self.router.clone();
        let guard = guard.clone();
        let flag = Arc::clone(&discarded);

        let join = thread::Builder::new()
            .name(format!("feedbridge-worker-{id}"))
            .spawn(move || {
                debug!(task_id = id, session = guard.generation(), "worker started");

                let outcome = run_guarded(work);
                match &outcome {
                    Ok(_) => debug!(task_id = id, "work finished"),
                    Err(TaskError::Failed(msg)) => warn!(task_id = id, error = %msg, "work failed"),
                    Err(TaskError::Panicked(msg)) => error!(task_id = id, panic = %msg, "work panicked"),
                }

                router.route(&guard, outcome, move |ui, outcome| {
                    if flag.load(Ordering::Acquire) {
                        debug!(task_id = id, "discarded task result dropped");
                        return;
                    }
                    on_result(ui, outcome);
                });
            })
            .map_err(FeedbridgeError::WorkerSpawn)?;

        Ok(TaskHandle {
            id,
            discarded,
            join: Some(join),
        })
    }
}

fn run_guarded<T, W>(work: W) -> TaskResult<T>
where
    W: FnOnce() -> anyhow::Result<T>,
{
    match catch_unwind(AssertUnwindSafe(work)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(TaskError::Failed(format!("{err:#}"))),
        Err(payload) => Err(TaskError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
