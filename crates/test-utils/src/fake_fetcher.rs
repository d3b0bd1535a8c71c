use std::collections::HashMap;
use std::sync::Mutex;

use feedbridge::errors::{FeedbridgeError, Result};
use feedbridge::net::{FetchResponse, Fetcher};

#[derive(Debug, Clone)]
enum Canned {
    Respond(FetchResponse),
    Fail(String),
}

/// A fake `Fetcher` serving canned responses by exact URL.
///
/// Unknown URLs answer HTTP 404 with an empty body.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    canned: Mutex<HashMap<String, Canned>>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(self, url: &str, status: u16, body: &str) -> Self {
        self.canned.lock().unwrap().insert(
            url.to_string(),
            Canned::Respond(FetchResponse {
                status,
                body: body.as_bytes().to_vec(),
            }),
        );
        self
    }

    pub fn failing(self, url: &str, message: &str) -> Self {
        self.canned
            .lock()
            .unwrap()
            .insert(url.to_string(), Canned::Fail(message.to_string()));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.canned.lock().unwrap().get(url).cloned() {
            Some(Canned::Respond(response)) => Ok(response),
            Some(Canned::Fail(message)) => Err(FeedbridgeError::Fetch(message)),
            None => Ok(FetchResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}
