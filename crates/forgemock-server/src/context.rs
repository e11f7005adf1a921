//! Normalized request context.
//!
//! The shell parses each incoming request into a [`RequestContext`] -
//! method, path, decoded query, credential header, optional JSON body -
//! before anything else sees it. Handlers never touch raw HTTP.

use std::collections::HashMap;

use axum::http::Method;
use serde_json::Value;

/// A parsed request, the router's and handlers' only view of HTTP.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request method.
    pub method: Method,
    /// Decoded path, e.g. `/_apis/build/builds`.
    pub path: String,
    /// Decoded query parameters; last occurrence wins for repeated keys.
    pub query: HashMap<String, String>,
    /// Raw `Authorization` header value, if present.
    pub authorization: Option<String>,
    /// Parsed JSON body, `None` when the body is empty or not JSON.
    pub body: Option<Value>,
}

impl RequestContext {
    /// Build a context from parsed parts.
    #[must_use]
    pub fn new(
        method: Method,
        path: &str,
        raw_query: Option<&str>,
        authorization: Option<String>,
        body: Option<Value>,
    ) -> Self {
        let query = raw_query
            .map(|raw| {
                url::form_urlencoded::parse(raw.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self {
            method,
            path: path.to_string(),
            query,
            authorization,
            body,
        }
    }

    /// A query parameter by its native-casing name.
    #[must_use]
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// A query parameter parsed as `usize`.
    #[must_use]
    pub fn query_usize(&self, key: &str) -> Option<usize> {
        self.query(key).and_then(|v| v.parse().ok())
    }

    /// A query parameter parsed as a boolean (`true`/`1` are truthy).
    #[must_use]
    pub fn query_bool(&self, key: &str) -> bool {
        matches!(self.query(key), Some("true" | "True" | "1"))
    }

    /// The path segment immediately following the API marker segment, if
    /// the path contains one.
    ///
    /// This is the discovery protocol's "area" token: for
    /// `/proj/_apis/build/builds` it is `build`.
    #[must_use]
    pub fn api_area(&self) -> Option<&str> {
        let mut segments = self.path.split('/').filter(|s| !s.is_empty());
        segments
            .by_ref()
            .find(|segment| *segment == crate::API_MARKER)?;
        segments.next()
    }

    /// Whether the path contains the API marker segment.
    #[must_use]
    pub fn is_api_path(&self) -> bool {
        self.path
            .split('/')
            .any(|segment| segment == crate::API_MARKER)
    }
}
