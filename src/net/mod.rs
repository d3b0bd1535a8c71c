// src/net/mod.rs

//! "Fetch bytes for a URL".
//!
//! Network calls are blocking and run on worker threads only, like helper
//! processes. [`HttpFetcher`] builds its `reqwest::blocking::Client` lazily on
//! first use so construction never happens on the UI thread or inside the
//! async runtime.

use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use tracing::{debug, info};

use crate::errors::{FeedbridgeError, Result};

const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) feedbridge/",
    env!("CARGO_PKG_VERSION")
);

const MAX_REDIRECTS: usize = 10;

/// Status plus body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Blocking URL fetcher. Any HTTP status is a response; only transport
/// failures are errors.
pub trait Fetcher: Send + Sync + Debug {
    fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

#[derive(Debug)]
pub struct HttpFetcher {
    timeout: Duration,
    client: Mutex<Option<Client>>,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: Mutex::new(None),
        }
    }

    fn client(&self) -> Result<Client> {
        let mut slot = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FeedbridgeError::Fetch(format!("building HTTP client: {e}")))?;
        debug!(timeout_ms = self.timeout.as_millis() as u64, "HTTP client built");

        *slot = Some(client.clone());
        Ok(client)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse> {
        let client = self.client()?;

        let response = client
            .get(url)
            .header(ACCEPT, "*/*")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.8")
            .send()
            .map_err(|e| FeedbridgeError::Fetch(format!("GET {url}: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| FeedbridgeError::Fetch(format!("reading body of {url}: {e}")))?
            .to_vec();

        info!(url, status, bytes = body.len(), "fetched");
        Ok(FetchResponse { status, body })
    }
}
