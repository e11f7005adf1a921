//! In-process test harness.
//!
//! [`TestServer`] drives the full dispatch pipeline - auth gate, router,
//! error taxonomy - without binding a socket, so downstream suites can
//! exercise the mock's contract as plain function calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use forgemock_core::envelope::{ApiResponse, ResponseStatus};
use forgemock_server::{auth, MockServer, RequestContext, ServerConfig};
use forgemock_store::{DeferredTasks, MockStore};
use serde_json::Value;

/// Base URL used by harness-built servers.
pub const TEST_BASE_URL: &str = "http://localhost:8080";

/// A fully wired mock server driven in-process.
#[derive(Debug)]
pub struct TestServer {
    server: MockServer,
}

impl Default for TestServer {
    fn default() -> Self {
        Self::new()
    }
}

impl TestServer {
    /// A server with the standard seed and a short self-heal delay.
    #[must_use]
    pub fn new() -> Self {
        Self::with_self_heal_delay(Duration::from_millis(25))
    }

    /// A server with an explicit self-heal delay.
    #[must_use]
    pub fn with_self_heal_delay(delay: Duration) -> Self {
        let config = ServerConfig::new()
            .base_url(TEST_BASE_URL)
            .self_heal_delay(delay);
        Self {
            server: MockServer::new(config),
        }
    }

    /// Handle to the entity store.
    #[must_use]
    pub fn store(&self) -> Arc<MockStore> {
        self.server.store()
    }

    /// Handle to the deferred scheduler.
    #[must_use]
    pub fn deferred(&self) -> Arc<DeferredTasks> {
        self.server.deferred()
    }

    /// The axum router, for socket-free HTTP-level tests via
    /// `tower::ServiceExt::oneshot`.
    #[must_use]
    pub fn axum_router(&self) -> axum::Router {
        self.server.axum_router()
    }

    /// Run a request through the shell's pipeline: auth gate, dispatch,
    /// not-found mapping.
    #[must_use]
    pub fn handle(&self, ctx: &RequestContext) -> ApiResponse {
        if let Err(err) = auth::authorize(ctx) {
            return err.into();
        }
        self.server.router().dispatch(ctx).unwrap_or_else(|| {
            ApiResponse::new(
                ResponseStatus::NotFound,
                Some(serde_json::json!({
                    "message": format!("No route matched {} {}", ctx.method, ctx.path),
                })),
            )
        })
    }
}

/// Fluent builder for [`RequestContext`] values.
///
/// Requests carry a basic credential by default; call
/// [`anonymous`](Self::anonymous) to drop it.
#[derive(Debug, Clone)]
pub struct TestRequest {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    authorization: Option<String>,
    body: Option<Value>,
}

impl TestRequest {
    fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: HashMap::new(),
            authorization: Some("Basic bW9jazptb2Nr".to_string()),
            body: None,
        }
    }

    /// A GET request.
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST request.
    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    /// A PUT request.
    #[must_use]
    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    /// A PATCH request.
    #[must_use]
    pub fn patch(path: &str) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// A DELETE request.
    #[must_use]
    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// An OPTIONS request.
    #[must_use]
    pub fn options(path: &str) -> Self {
        Self::new(Method::OPTIONS, path)
    }

    /// Add a query parameter.
    #[must_use]
    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    /// Set a JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Drop the credential header.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.authorization = None;
        self
    }

    /// Set an explicit `Authorization` header value.
    #[must_use]
    pub fn authorization(mut self, value: &str) -> Self {
        self.authorization = Some(value.to_string());
        self
    }

    /// Finish into a [`RequestContext`].
    #[must_use]
    pub fn build(self) -> RequestContext {
        let mut ctx = RequestContext::new(self.method, &self.path, None, self.authorization, self.body);
        ctx.query = self.query;
        ctx
    }
}
