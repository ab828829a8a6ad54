//! In-memory [`Fetcher`] for engine tests.

use crate::error::{Result, ScanError};
use crate::fetch::{Fetcher, Response};
use crate::registry::RunContext;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy)]
enum Failure {
    Timeout,
    Refused,
}

/// Serves canned responses keyed by full URL string. Unknown URLs get the
/// fallback status (404 unless changed with [`MockFetcher::catch_all`]).
pub(crate) struct MockFetcher {
    pages: HashMap<String, Response>,
    failures: HashMap<String, Failure>,
    fallback: Response,
    requests: Mutex<Vec<String>>,
    cancel_on: Option<(String, Arc<RunContext>)>,
}

impl MockFetcher {
    pub(crate) fn new() -> Self {
        Self {
            pages: HashMap::new(),
            failures: HashMap::new(),
            fallback: Response::new(404, "Not Found"),
            requests: Mutex::new(Vec::new()),
            cancel_on: None,
        }
    }

    pub(crate) fn page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages.insert(url.to_string(), Response::new(status, body));
        self
    }

    pub(crate) fn catch_all(mut self, status: u16, body: &str) -> Self {
        self.fallback = Response::new(status, body);
        self
    }

    pub(crate) fn timeout(mut self, url: &str) -> Self {
        self.failures.insert(url.to_string(), Failure::Timeout);
        self
    }

    pub(crate) fn refuse(mut self, url: &str) -> Self {
        self.failures.insert(url.to_string(), Failure::Refused);
        self
    }

    /// Cancel `ctx` as soon as `url` is requested, as an interrupt would.
    pub(crate) fn cancel_on(mut self, url: &str, ctx: Arc<RunContext>) -> Self {
        self.cancel_on = Some((url.to_string(), ctx));
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == url).count()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Response>> + Send {
        self.requests.lock().unwrap().push(url.to_string());
        if let Some((ref trigger, ref ctx)) = self.cancel_on {
            if trigger == url {
                ctx.cancel();
            }
        }
        let result = match self.failures.get(url) {
            Some(Failure::Timeout) => Err(ScanError::Timeout(url.to_string())),
            Some(Failure::Refused) => Err(ScanError::Other(format!("connection refused: {}", url))),
            None => Ok(self.pages.get(url).unwrap_or(&self.fallback).clone()),
        };
        async move {
            tokio::task::yield_now().await;
            result
        }
    }
}
