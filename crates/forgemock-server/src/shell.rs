//! The HTTP shell.
//!
//! A thin axum layer: bind, parse each request into a [`RequestContext`],
//! run the coarse auth gate, delegate to the [`Router`], serialize the
//! result. All matching lives in the router; axum only contributes the
//! socket loop, a catch-all fallback, request tracing, and panic
//! catching. CORS headers are attached here so every response carries
//! them, errors included.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use forgemock_core::discovery::DiscoveryTables;
use forgemock_core::envelope::{ApiResponse, ResponseStatus};
use forgemock_core::error::MockError;
use forgemock_store::{DeferredTasks, MockStore};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth;
use crate::context::RequestContext;
use crate::handlers::{
    BuildHandler, DistributedTaskHandler, ExtensionHandler, LocationHandler, WorkItemHandler,
};
use crate::router::Router;

/// Largest request body the shell will buffer.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Server configuration.
///
/// # Example
///
/// ```rust
/// use forgemock_server::ServerConfig;
///
/// let config = ServerConfig::new()
///     .addr("127.0.0.1:9090")
///     .base_url("http://127.0.0.1:9090");
/// assert_eq!(config.addr, "127.0.0.1:9090");
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub addr: String,
    /// Public base URL advertised in discovery tables and entity URLs.
    pub base_url: String,
    /// Delay before the deleted self-heal fixture is re-provisioned.
    pub self_heal_delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
            base_url: "http://127.0.0.1:8080".to_string(),
            self_heal_delay: Duration::from_millis(500),
        }
    }
}

impl ServerConfig {
    /// Defaults: bind `127.0.0.1:8080`, matching base URL.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    #[must_use]
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = addr.into();
        self
    }

    /// Set the advertised base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the self-heal re-provisioning delay.
    #[must_use]
    pub fn self_heal_delay(mut self, delay: Duration) -> Self {
        self.self_heal_delay = delay;
        self
    }
}

/// The assembled mock server: store, handlers, router, shell.
#[derive(Debug)]
pub struct MockServer {
    config: ServerConfig,
    store: Arc<MockStore>,
    deferred: Arc<DeferredTasks>,
    router: Arc<Router>,
}

#[derive(Clone)]
struct AppState {
    router: Arc<Router>,
}

impl MockServer {
    /// Wire up the store, the five handlers, and the router.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let tables = Arc::new(DiscoveryTables::new(&config.base_url));
        let store = Arc::new(MockStore::new(&config.base_url));
        let deferred = Arc::new(DeferredTasks::new());

        let location = LocationHandler::new(Arc::clone(&tables));
        let build = BuildHandler::new(Arc::clone(&store));
        let tasks = DistributedTaskHandler::new(Arc::clone(&store));
        let work_items = WorkItemHandler::new(Arc::clone(&store));
        let extensions = ExtensionHandler::with_self_heal_delay(
            Arc::clone(&store),
            Arc::clone(&deferred),
            config.self_heal_delay,
        );

        let mut routes = location.routes();
        routes.extend(build.routes());
        routes.extend(tasks.routes());
        routes.extend(work_items.routes());
        routes.extend(extensions.routes());

        let router = Arc::new(Router::new(tables, routes));
        Self {
            config,
            store,
            deferred,
            router,
        }
    }

    /// Handle to the entity store (for test seeding and assertions).
    #[must_use]
    pub fn store(&self) -> Arc<MockStore> {
        Arc::clone(&self.store)
    }

    /// Handle to the deferred scheduler.
    #[must_use]
    pub fn deferred(&self) -> Arc<DeferredTasks> {
        Arc::clone(&self.deferred)
    }

    /// Handle to the dispatch router.
    #[must_use]
    pub fn router(&self) -> Arc<Router> {
        Arc::clone(&self.router)
    }

    /// Build the axum router: one catch-all fallback plus shell layers.
    #[must_use]
    pub fn axum_router(&self) -> axum::Router {
        let state = AppState {
            router: Arc::clone(&self.router),
        };
        axum::Router::new()
            .fallback(handle_request)
            .with_state(state)
            .layer(CatchPanicLayer::new())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve until ctrl-c.
    pub async fn serve(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        self.serve_on(listener, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
    }

    /// Serve on an existing listener until `shutdown` resolves.
    ///
    /// On return the listening socket is released and every pending
    /// deferred action has been aborted, so nothing can mutate a
    /// torn-down store.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(addr = %listener.local_addr()?, "mock server listening");
        let result = axum::serve(listener, self.axum_router())
            .with_graceful_shutdown(shutdown)
            .await;
        self.deferred.clear();
        info!("mock server stopped");
        result
    }
}

/// The catch-all request handler: parse, gate, dispatch, serialize.
async fn handle_request(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "failed to read request body");
            return to_http(MockError::validation("unreadable request body").into());
        }
    };
    let body_json = if bytes.is_empty() {
        None
    } else {
        serde_json::from_slice(&bytes).ok()
    };

    let authorization = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let ctx = RequestContext::new(
        parts.method.clone(),
        parts.uri.path(),
        parts.uri.query(),
        authorization,
        body_json,
    );

    if let Err(err) = auth::authorize(&ctx) {
        warn!(method = %ctx.method, path = %ctx.path, "rejected unauthenticated request");
        return to_http(err.into());
    }

    match state.router.dispatch(&ctx) {
        Some(response) => to_http(response),
        None => {
            warn!(method = %ctx.method, path = %ctx.path, "no route matched");
            to_http(not_found_diagnostic(&ctx))
        }
    }
}

/// 404 with a diagnostic listing of the discovery endpoints, to aid
/// debugging of client/mock contract drift.
fn not_found_diagnostic(ctx: &RequestContext) -> ApiResponse {
    ApiResponse::new(
        ResponseStatus::NotFound,
        Some(json!({
            "message": format!("No route matched {} {}", ctx.method, ctx.path),
            "knownEndpoints": [
                "GET /_apis/resourceareas",
                "GET /_apis/resourceareas/{areaId}",
                "OPTIONS /_apis/{area}",
                "GET /_apis/connectiondata",
                "GET /health",
            ],
        })),
    )
}

/// Serialize an [`ApiResponse`], attaching the CORS headers every
/// response carries.
fn to_http(api: ApiResponse) -> Response {
    let status = StatusCode::from_u16(api.status.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let builder = Response::builder()
        .status(status)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            "GET, POST, PUT, PATCH, DELETE, OPTIONS",
        )
        .header(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            "Content-Type, Authorization",
        );

    let result = match api.body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    };
    result.unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
