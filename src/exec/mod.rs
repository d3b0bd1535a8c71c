// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`subprocess`] runs a helper synchronously and captures its exit status,
//!   stdout and stderr in a [`SubprocessResult`].
//! - [`backend`] provides the `ProcessRunner` trait and a concrete
//!   `RealProcessRunner` that sessions use in production, and which tests can
//!   replace with a fake implementation.

pub mod backend;
pub mod subprocess;

pub use backend::{ProcessRunner, RealProcessRunner};
pub use subprocess::{run_subprocess, SubprocessResult};
