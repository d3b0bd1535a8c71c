#![allow(dead_code)]

use std::time::Duration;

// Each test binary uses a different subset of these.
#[allow(unused_imports)]
pub use feedbridge_test_utils::builders;
#[allow(unused_imports)]
pub use feedbridge_test_utils::fake_fetcher::FakeFetcher;
#[allow(unused_imports)]
pub use feedbridge_test_utils::fake_runner::{FakeResponse, FakeRunner, Invocation};
#[allow(unused_imports)]
pub use feedbridge_test_utils::{init_tracing, with_timeout, FakeApp};

/// Wait (on real time) until `cond` holds, failing the test after 5 s.
pub async fn wait_for(mut cond: impl FnMut() -> bool) {
    with_timeout(async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
}

/// Feed `text` to the lookup dialog one keystroke at a time.
pub fn type_text(app: &mut FakeApp, text: &str) {
    for (idx, ch) in text.char_indices() {
        app.ui().lookup_input(&text[..idx + ch.len_utf8()]);
    }
}
