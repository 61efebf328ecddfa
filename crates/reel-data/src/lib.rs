//! HTTP client utilities for Reel.
//!
//! Provides a small builder API over a pluggable [`HttpTransport`], with
//! automatic JSON handling. The default transport is `reqwest`.
//!
//! # Example
//!
//! ```rust,ignore
//! use reel_data::FetchClient;
//!
//! let client = FetchClient::new()
//!     .with_base_url("https://api.themoviedb.org/3")
//!     .with_default_header("Accept", "application/json");
//!
//! let page: serde_json::Value = client
//!     .get("/search/movie")
//!     .query("query", "batman")
//!     .bearer_auth(token)
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod error;
mod request;
mod response;
mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

use std::collections::HashMap;
use std::sync::Arc;

pub use error::FetchError;
pub use request::{Method, Request, RequestBuilder};
pub use response::Response;
pub use transport::{HttpTransport, ReqwestTransport};

/// HTTP client for making outbound requests.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct FetchClient {
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    transport: Arc<dyn HttpTransport>,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers.keys())
            .finish_non_exhaustive()
    }
}

impl FetchClient {
    /// Create a new HTTP client backed by `reqwest`.
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    /// Create a client that sends through the given transport.
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: None,
            default_headers: HashMap::new(),
            transport,
        }
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a PATCH request.
    pub fn patch(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Patch, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!("{}{}", base.trim_end_matches('/'), url)
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(method, full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            builder,
            transport: Arc::clone(&self.transport),
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    builder: RequestBuilder,
    transport: Arc<dyn HttpTransport>,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.query(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Set the Accept header.
    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.builder = self.builder.accept(content_type);
        self
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<Response, FetchError> {
        let request = self.builder.build()?;
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        self.transport.send(request).await
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, HttpTransport, Method, Response};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockRoute, MockTransport};

    #[tokio::test]
    async fn test_base_url_and_default_headers() {
        let transport = MockTransport::new();
        transport.route(
            MockRoute::get("/discover/movie").json(200, serde_json::json!({"results": []})),
        );

        let client = FetchClient::with_transport(transport.clone())
            .with_base_url("https://api.example.com/3/")
            .with_default_header("Accept", "application/json");

        let resp = client
            .get("/discover/movie")
            .query("sort_by", "popularity.desc")
            .send()
            .await
            .unwrap();
        assert!(resp.is_success());

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].url.as_str(),
            "https://api.example.com/3/discover/movie?sort_by=popularity.desc"
        );
        assert_eq!(sent[0].header("accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_absolute_url_ignores_base() {
        let transport = MockTransport::new();
        let client =
            FetchClient::with_transport(transport.clone()).with_base_url("https://a.example.com");

        let resp = client.get("https://b.example.com/x").send().await.unwrap();
        assert_eq!(resp.status, 404);
        assert_eq!(transport.requests()[0].url.host_str(), Some("b.example.com"));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = MockTransport::new();
        transport.route(MockRoute::get("/x").fail("connection reset"));
        let client = FetchClient::with_transport(transport);

        let err = client.get("https://a.example.com/x").send().await.unwrap_err();
        assert!(matches!(err, FetchError::Connection(_)));
    }
}
