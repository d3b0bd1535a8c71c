// src/exec/subprocess.rs

//! Synchronous helper process runner.
//!
//! Blocks until the child exits, so it must only ever be called from a worker
//! thread (see `engine::executor`).

use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::errors::{FeedbridgeError, Result};
use crate::locate::Located;

/// Captured outcome of one helper run.
///
/// A non-zero `exit_status` is data, not an error. `-1` means the process was
/// terminated without an exit code (e.g. by a signal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubprocessResult {
    pub exit_status: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl SubprocessResult {
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Spawn `program` with `args`, wait, and capture everything.
///
/// stdin is closed so a helper waiting for input cannot hang the worker.
pub fn run_subprocess(program: &Located, args: &[String]) -> Result<SubprocessResult> {
    info!(program = %program, ?args, "starting helper process");

    let output = Command::new(program.program())
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| FeedbridgeError::Launch {
            program: program.to_string(),
            source,
        })?;

    let exit_status = output.status.code().unwrap_or(-1);

    info!(
        program = %program,
        exit_status,
        success = output.status.success(),
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "helper process exited"
    );
    debug!(program = %program, stderr = %String::from_utf8_lossy(&output.stderr), "helper stderr");

    Ok(SubprocessResult {
        exit_status,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}
