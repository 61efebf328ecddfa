//! HTTP request builder.

use std::collections::HashMap;

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use url::Url;

use crate::FetchError;

/// HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built request, ready to hand to a transport.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Get a header value (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the request body as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }
}

/// A builder for constructing HTTP requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Option<Vec<u8>>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Append a query parameter. Values are percent-encoded when the request is built.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        let json = serde_json::to_vec(value)?;
        self.headers
            .insert(CONTENT_TYPE.as_str().to_string(), "application/json".to_string());
        self.body = Some(json);
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        self.header(AUTHORIZATION.as_str(), format!("Bearer {}", token.as_ref()))
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header(ACCEPT.as_str(), content_type)
    }

    /// Resolve the URL and query string into a sendable [`Request`].
    pub fn build(self) -> Result<Request, FetchError> {
        let mut url = Url::parse(&self.url)?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(Request {
            method: self.method,
            url,
            headers: self.headers,
            body: self.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_escapes_query_values() {
        let request = RequestBuilder::new(Method::Get, "https://api.example.com/3/search/movie")
            .query("query", "star wars & co")
            .build()
            .unwrap();

        assert_eq!(request.url.path(), "/3/search/movie");
        let pairs: Vec<(String, String)> = request
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs, vec![("query".to_string(), "star wars & co".to_string())]);
        assert!(!request.url.as_str().contains(' '));
        assert!(request.url.as_str().contains("%26"));
    }

    #[test]
    fn test_build_keeps_existing_query() {
        let request = RequestBuilder::new(Method::Get, "https://api.example.com/list?a=1")
            .query("b", "2")
            .build()
            .unwrap();
        assert_eq!(request.url.query(), Some("a=1&b=2"));
    }

    #[test]
    fn test_build_invalid_url() {
        let result = RequestBuilder::new(Method::Get, "not a url").build();
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_bearer_and_accept_headers() {
        let request = RequestBuilder::new(Method::Get, "https://api.example.com/")
            .bearer_auth("secret")
            .accept("application/json")
            .build()
            .unwrap();
        assert_eq!(request.header("Authorization"), Some("Bearer secret"));
        assert_eq!(request.header("ACCEPT"), Some("application/json"));
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = RequestBuilder::new(Method::Post, "https://api.example.com/")
            .json(&serde_json::json!({"count": 1}))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.json_body(), Some(serde_json::json!({"count": 1})));
    }
}
