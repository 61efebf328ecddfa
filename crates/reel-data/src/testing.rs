//! Scripted transport for tests.
//!
//! Routes are matched newest-first, so a test can register a general reply
//! and then override it for a specific query.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::{FetchError, HttpTransport, Method, Request, Response};

#[derive(Debug, Clone)]
enum Reply {
    Json { status: u16, body: Value },
    Fail(String),
}

/// One scripted endpoint.
#[derive(Debug, Clone)]
pub struct MockRoute {
    method: Method,
    path_suffix: String,
    query_contains: Option<String>,
    delay: Option<Duration>,
    reply: Reply,
}

impl MockRoute {
    pub fn new(method: Method, path_suffix: impl Into<String>) -> Self {
        Self {
            method,
            path_suffix: path_suffix.into(),
            query_contains: None,
            delay: None,
            reply: Reply::Json {
                status: 200,
                body: Value::Null,
            },
        }
    }

    pub fn get(path_suffix: impl Into<String>) -> Self {
        Self::new(Method::Get, path_suffix)
    }

    pub fn post(path_suffix: impl Into<String>) -> Self {
        Self::new(Method::Post, path_suffix)
    }

    pub fn patch(path_suffix: impl Into<String>) -> Self {
        Self::new(Method::Patch, path_suffix)
    }

    /// Only match when the decoded query string contains `needle`.
    pub fn with_query(mut self, needle: impl Into<String>) -> Self {
        self.query_contains = Some(needle.into());
        self
    }

    /// Hold the reply for `delay` (tokio time, so paused clocks apply).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn json(mut self, status: u16, body: Value) -> Self {
        self.reply = Reply::Json { status, body };
        self
    }

    /// Fail at the transport level, as a dropped connection would.
    pub fn fail(mut self, message: impl Into<String>) -> Self {
        self.reply = Reply::Fail(message.into());
        self
    }

    fn matches(&self, request: &Request) -> bool {
        if self.method != request.method || !request.url.path().ends_with(&self.path_suffix) {
            return false;
        }
        match &self.query_contains {
            Some(needle) => decoded_query(request).contains(needle.as_str()),
            None => true,
        }
    }
}

fn decoded_query(request: &Request) -> String {
    request
        .url
        .query_pairs()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// In-process [`HttpTransport`] that answers from registered [`MockRoute`]s
/// and records every request it sees.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<Vec<MockRoute>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, route: MockRoute) {
        lock(&self.routes).push(route);
    }

    /// All requests sent so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        lock(&self.requests).clone()
    }

    /// Number of requests whose path ends with `path_suffix`.
    pub fn count(&self, path_suffix: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|r| r.url.path().ends_with(path_suffix))
            .count()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        lock(&self.requests).push(request.clone());

        let route = lock(&self.routes)
            .iter()
            .rev()
            .find(|r| r.matches(&request))
            .cloned();

        let Some(route) = route else {
            return Ok(Response::new(404, HashMap::new(), b"no mock route".to_vec()));
        };

        if let Some(delay) = route.delay {
            tokio::time::sleep(delay).await;
        }

        match route.reply {
            Reply::Json { status, body } => {
                let mut headers = HashMap::new();
                headers.insert("content-type".to_string(), "application/json".to_string());
                Ok(Response::new(status, headers, serde_json::to_vec(&body)?))
            }
            Reply::Fail(message) => Err(FetchError::Connection(message)),
        }
    }
}
