pub mod builders;
pub mod fake_fetcher;
pub mod fake_runner;

use std::sync::{Arc, Once};

use feedbridge::app::{build_ui_loop, Ui};
use feedbridge::config::ConfigFile;
use feedbridge::engine::UiLoop;
use feedbridge::fs::mock::MockFileSystem;
use tracing_subscriber::{fmt, EnvFilter};

use crate::fake_fetcher::FakeFetcher;
use crate::fake_runner::FakeRunner;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .with_thread_names(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Everything a session test needs, wired to fakes.
pub struct FakeApp {
    pub ui_loop: UiLoop<Ui>,
    pub runner: Arc<FakeRunner>,
    pub fs: MockFileSystem,
    pub fetcher: Arc<FakeFetcher>,
}

impl FakeApp {
    pub fn new(config: ConfigFile, runner: FakeRunner, fs: MockFileSystem, fetcher: FakeFetcher) -> Self {
        let runner = Arc::new(runner);
        let fetcher = Arc::new(fetcher);
        let ui_loop = build_ui_loop(
            config,
            runner.clone(),
            Arc::new(fs.clone()),
            fetcher.clone(),
        );
        Self {
            ui_loop,
            runner,
            fs,
            fetcher,
        }
    }

    pub fn ui(&mut self) -> &mut Ui {
        self.ui_loop.state_mut()
    }

    /// Drive the UI loop until `done` holds, failing the test after 5 s.
    pub async fn settle(&mut self, done: impl FnMut(&Ui) -> bool) {
        with_timeout(self.ui_loop.run_until(done)).await;
    }
}
