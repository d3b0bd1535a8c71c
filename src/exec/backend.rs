// src/exec/backend.rs

//! Pluggable process runner abstraction.
//!
//! Sessions talk to a `ProcessRunner` instead of calling
//! `std::process::Command` directly. This makes it easy to swap in a fake
//! runner in tests while keeping the production implementation in
//! [`subprocess`](super::subprocess).
//!
//! - `RealProcessRunner` is the default implementation used by `feedbridge`.
//! - Tests can provide their own `ProcessRunner` that, for example, records
//!   invocations and returns scripted `SubprocessResult`s.

use std::fmt::Debug;

use crate::errors::Result;
use crate::locate::Located;

use super::subprocess::{run_subprocess, SubprocessResult};

/// Trait abstracting how a helper process is run.
///
/// Implementations are called on worker threads and may block.
pub trait ProcessRunner: Send + Sync + Debug {
    /// Run `program` to completion.
    ///
    /// Only a failure to launch is an `Err`; a non-zero exit is reported
    /// inside the returned [`SubprocessResult`].
    fn run(&self, program: &Located, args: &[String]) -> Result<SubprocessResult>;
}

/// Real runner used in production.
#[derive(Debug, Clone, Default)]
pub struct RealProcessRunner;

impl ProcessRunner for RealProcessRunner {
    fn run(&self, program: &Located, args: &[String]) -> Result<SubprocessResult> {
        run_subprocess(program, args)
    }
}
