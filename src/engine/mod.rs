// src/engine/mod.rs

//! Background-task / UI-thread coordination.
//!
//! This module ties together:
//! - the single-threaded UI loop and its `post(closure)` interface
//!   ([`dispatcher`])
//! - per-session liveness flags ([`lifecycle`])
//! - one-thread-per-task execution of blocking work ([`executor`])
//! - the guarded re-entry point for worker results ([`router`])
//! - input debouncing with race-free cancellation ([`debounce`])
//!
//! Data flow: UI event → `Debouncer` → `TaskExecutor` worker → `ResultRouter`
//! → `Dispatcher` → UI job (a no-op if the owning session is gone).

pub mod debounce;
pub mod dispatcher;
pub mod executor;
pub mod lifecycle;
pub mod router;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use dispatcher::{Dispatcher, LoopDispatcher, UiJob, UiLoop};
pub use executor::{TaskError, TaskExecutor, TaskHandle, TaskId, TaskResult};
pub use lifecycle::{Lifecycle, LifecycleGuard};
pub use router::ResultRouter;
