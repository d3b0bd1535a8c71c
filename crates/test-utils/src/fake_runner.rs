use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use feedbridge::errors::{FeedbridgeError, Result};
use feedbridge::exec::{ProcessRunner, SubprocessResult};
use feedbridge::fs::mock::MockFileSystem;
use feedbridge::locate::Located;

/// One scripted helper run.
#[derive(Debug, Clone)]
pub struct FakeResponse {
    pub exit_status: i32,
    pub stdout: String,
    pub stderr: String,
    /// URLs to write into the feed file before "exiting".
    pub feeds: Option<Vec<String>>,
    /// Simulated run time; the worker thread sleeps this long.
    pub delay: Duration,
    pub launch_error: Option<io::ErrorKind>,
}

impl FakeResponse {
    pub fn success(stdout: &str) -> Self {
        Self {
            exit_status: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
            feeds: None,
            delay: Duration::ZERO,
            launch_error: None,
        }
    }

    pub fn failure(exit_status: i32, stderr: &str) -> Self {
        Self {
            exit_status,
            stderr: stderr.to_string(),
            ..Self::success("")
        }
    }

    pub fn launch_error(kind: io::ErrorKind) -> Self {
        Self {
            launch_error: Some(kind),
            ..Self::success("")
        }
    }

    pub fn with_feeds(mut self, urls: &[&str]) -> Self {
        self.feeds = Some(urls.iter().map(|u| u.to_string()).collect());
        self
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// What the fake saw for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: Located,
    pub args: Vec<String>,
    /// Whether the feed file existed when the helper "started".
    pub feeds_file_present: bool,
}

/// A fake `ProcessRunner` that:
/// - records every invocation
/// - replays scripted responses in order (then a silent success)
/// - optionally writes the feed file into a `MockFileSystem`
#[derive(Debug, Default)]
pub struct FakeRunner {
    responses: Mutex<VecDeque<FakeResponse>>,
    invocations: Arc<Mutex<Vec<Invocation>>>,
    feeds_file: Option<(MockFileSystem, PathBuf)>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `fs` at `path` as the helper's side-channel file.
    pub fn with_feeds_file(mut self, fs: &MockFileSystem, path: impl AsRef<Path>) -> Self {
        self.feeds_file = Some((fs.clone(), path.as_ref().to_path_buf()));
        self
    }

    pub fn respond(self, response: FakeResponse) -> Self {
        self.push(response);
        self
    }

    pub fn push(&self, response: FakeResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, program: &Located, args: &[String]) -> Result<SubprocessResult> {
        let feeds_file_present = self
            .feeds_file
            .as_ref()
            .is_some_and(|(fs, path)| fs.contains_file(path));

        // Take the response before recording the call, so a test that waits
        // on `call_count` knows this run's script entry is already claimed.
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| FakeResponse::success(""));

        self.invocations.lock().unwrap().push(Invocation {
            program: program.clone(),
            args: args.to_vec(),
            feeds_file_present,
        });

        if !response.delay.is_zero() {
            thread::sleep(response.delay);
        }

        if let Some(kind) = response.launch_error {
            return Err(FeedbridgeError::Launch {
                program: program.to_string(),
                source: io::Error::from(kind),
            });
        }

        if let (Some(urls), Some((fs, path))) = (&response.feeds, &self.feeds_file) {
            let mut text = urls.join("\n");
            text.push('\n');
            fs.add_file(path, text);
        }

        Ok(SubprocessResult {
            exit_status: response.exit_status,
            stdout: response.stdout.into_bytes(),
            stderr: response.stderr.into_bytes(),
        })
    }
}
