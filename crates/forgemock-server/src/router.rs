//! Ordered, pattern-based request routing.
//!
//! The router holds the union of every handler's route descriptors and
//! dispatches with linear, first-match-wins semantics: the method is
//! compared for exact equality before the pattern is tested, and patterns
//! are either exact path strings or compiled regular expressions.
//!
//! Two dispatch paths run ahead of the ordered list:
//!
//! 1. **Discovery emulation** - an OPTIONS request whose path contains the
//!    API marker segment answers the canned resource table of the area
//!    named by the segment right after the marker. Unknown areas fall
//!    through to an ordinary CORS-OK empty response.
//! 2. **Legacy fallback** - after the ordered list, a few hand-matched
//!    exact paths (connection/identity probe, coarse resource-area
//!    enumeration) are answered directly, preserving older client code
//!    paths that bypass per-area registration.
//!
//! Handler failures never escape dispatch: `Err` maps through the error
//! taxonomy and a panicking action is caught and turned into a generic
//! 500.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use axum::http::Method;
use forgemock_core::discovery::{connection_data, DiscoveryTables};
use forgemock_core::envelope::{ApiResponse, ListEnvelope, ResponseStatus};
use forgemock_core::error::MockError;
use regex::Regex;
use tracing::{debug, error, warn};

use crate::context::RequestContext;

/// Result type of every route action.
pub type HandlerResult = Result<ApiResponse, MockError>;

/// A route's callable action.
pub type RouteAction = Arc<dyn Fn(&RequestContext, &RouteMatch) -> HandlerResult + Send + Sync>;

/// How a route matches a path.
#[derive(Debug, Clone)]
pub enum RoutePattern {
    /// Byte-for-byte path equality.
    Exact(String),
    /// Regular-expression match with capture groups.
    Pattern(Regex),
}

/// Captures extracted by a matched route pattern.
#[derive(Debug, Clone, Default)]
pub struct RouteMatch {
    captures: Vec<Option<String>>,
}

impl RouteMatch {
    /// The empty match produced by exact patterns.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_captures(caps: &regex::Captures<'_>) -> Self {
        Self {
            captures: caps
                .iter()
                .skip(1)
                .map(|c| c.map(|m| m.as_str().to_string()))
                .collect(),
        }
    }

    /// Capture group `index` (1-based, like the regex), if it matched.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.captures
            .get(index.checked_sub(1)?)
            .and_then(|c| c.as_deref())
    }
}

/// One ordered route descriptor.
pub struct Route {
    /// Method compared for exact equality.
    pub method: Method,
    /// Exact or regex path pattern.
    pub pattern: RoutePattern,
    /// Stable name used in logs.
    pub name: &'static str,
    /// The handler action.
    pub action: RouteAction,
}

impl Route {
    /// A route matched by exact path equality.
    #[must_use]
    pub fn exact(method: Method, path: &str, name: &'static str, action: RouteAction) -> Self {
        Self {
            method,
            pattern: RoutePattern::Exact(path.to_string()),
            name,
            action,
        }
    }

    /// A route matched by regular expression.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` does not compile. Patterns are string literals
    /// registered at startup, so a failure here is a programming error
    /// caught by the first test that builds a router.
    #[must_use]
    pub fn pattern(method: Method, pattern: &str, name: &'static str, action: RouteAction) -> Self {
        let regex = Regex::new(pattern).expect("route pattern must compile");
        Self {
            method,
            pattern: RoutePattern::Pattern(regex),
            name,
            action,
        }
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The mock server's router.
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
    tables: Arc<DiscoveryTables>,
}

impl Router {
    /// Build a router over the ordered union of the handlers' routes.
    #[must_use]
    pub fn new(tables: Arc<DiscoveryTables>, routes: Vec<Route>) -> Self {
        Self { routes, tables }
    }

    /// Dispatch a parsed request.
    ///
    /// Returns `None` when no discovery branch, registered route, or
    /// legacy fallback claims the request; the shell answers those with
    /// its not-found diagnostic.
    #[must_use]
    pub fn dispatch(&self, ctx: &RequestContext) -> Option<ApiResponse> {
        if ctx.method == Method::OPTIONS {
            return Some(self.discovery(ctx));
        }

        for route in &self.routes {
            if route.method != ctx.method {
                continue;
            }
            match &route.pattern {
                RoutePattern::Exact(path) if *path == ctx.path => {
                    debug!(route = route.name, path = %ctx.path, "dispatching exact route");
                    return Some(Self::invoke(route, ctx, RouteMatch::empty()));
                }
                RoutePattern::Pattern(regex) => {
                    if let Some(caps) = regex.captures(&ctx.path) {
                        debug!(route = route.name, path = %ctx.path, "dispatching pattern route");
                        return Some(Self::invoke(route, ctx, RouteMatch::from_captures(&caps)));
                    }
                }
                RoutePattern::Exact(_) => {}
            }
        }

        self.legacy_fallback(ctx)
    }

    /// Emulate the discovery protocol for an OPTIONS request.
    fn discovery(&self, ctx: &RequestContext) -> ApiResponse {
        if let Some(area) = ctx.api_area() {
            if let Some(resources) = self.tables.resources_for(area) {
                debug!(area, count = resources.len(), "answering discovery table");
                return ApiResponse::ok(serde_json::json!({ "value": resources }));
            }
            debug!(area, "no discovery table for area");
        }
        // Ordinary CORS handling: preflight or unknown area, empty 200.
        ApiResponse::new(ResponseStatus::Ok, None)
    }

    /// Hand-matched exact paths kept for older client code paths.
    fn legacy_fallback(&self, ctx: &RequestContext) -> Option<ApiResponse> {
        if ctx.method != Method::GET {
            return None;
        }
        match ctx.path.as_str() {
            "/_apis" | "/_apis/" => {
                debug!("answering coarse resource-area enumeration");
                Some(ListEnvelope::new(self.tables.areas()).into())
            }
            "/_apis/connectiondata" => {
                debug!("answering connection/identity probe");
                Some(ApiResponse::ok(connection_data()))
            }
            _ => None,
        }
    }

    fn invoke(route: &Route, ctx: &RequestContext, matched: RouteMatch) -> ApiResponse {
        let outcome = catch_unwind(AssertUnwindSafe(|| (route.action)(ctx, &matched)));
        match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                warn!(route = route.name, error = %err, "handler returned error");
                ApiResponse::from(err)
            }
            Err(_) => {
                error!(route = route.name, path = %ctx.path, "handler panicked");
                ApiResponse::from(MockError::internal(format!(
                    "handler '{}' panicked",
                    route.name
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tables() -> Arc<DiscoveryTables> {
        Arc::new(DiscoveryTables::new("http://localhost:8080"))
    }

    fn ctx(method: Method, path: &str) -> RequestContext {
        RequestContext::new(method, path, None, None, None)
    }

    fn ok_route(method: Method, pattern: RoutePattern, name: &'static str, body: i64) -> Route {
        Route {
            method,
            pattern,
            name,
            action: Arc::new(move |_, _| Ok(ApiResponse::ok(serde_json::json!({ "hit": body })))),
        }
    }

    #[test]
    fn test_first_match_wins() {
        let router = Router::new(
            tables(),
            vec![
                ok_route(
                    Method::GET,
                    RoutePattern::Exact("/thing".to_string()),
                    "first",
                    1,
                ),
                ok_route(
                    Method::GET,
                    RoutePattern::Exact("/thing".to_string()),
                    "second",
                    2,
                ),
            ],
        );

        let response = router.dispatch(&ctx(Method::GET, "/thing")).expect("handled");
        assert_eq!(response.body.expect("body")["hit"], 1);
    }

    #[test]
    fn test_method_is_checked_before_pattern() {
        let router = Router::new(
            tables(),
            vec![ok_route(
                Method::POST,
                RoutePattern::Exact("/thing".to_string()),
                "post-only",
                1,
            )],
        );
        assert!(router.dispatch(&ctx(Method::GET, "/thing")).is_none());
    }

    #[test]
    fn test_pattern_route_exposes_captures() {
        let action: RouteAction = Arc::new(|_, matched| {
            Ok(ApiResponse::ok(
                serde_json::json!({ "id": matched.get(1).expect("capture") }),
            ))
        });
        let router = Router::new(
            tables(),
            vec![Route::pattern(
                Method::GET,
                r"^/items/(\d+)$",
                "items.get",
                action,
            )],
        );

        let response = router.dispatch(&ctx(Method::GET, "/items/42")).expect("handled");
        assert_eq!(response.body.expect("body")["id"], "42");
    }

    #[test]
    fn test_options_with_known_area_returns_resource_table() {
        let router = Router::new(tables(), Vec::new());
        let response = router
            .dispatch(&ctx(Method::OPTIONS, "/_apis/distributedtask"))
            .expect("handled");
        let body = response.body.expect("body");
        assert_eq!(
            body["value"][0]["id"],
            "60aac929-f0cd-4bc8-9ce4-6b30e8f1b1bd"
        );
    }

    #[test]
    fn test_options_with_unknown_area_is_cors_ok() {
        let router = Router::new(tables(), Vec::new());
        let response = router
            .dispatch(&ctx(Method::OPTIONS, "/_apis/unknownarea"))
            .expect("handled");
        assert_eq!(response.status, ResponseStatus::Ok);
        assert!(response.body.is_none());
    }

    #[test]
    fn test_legacy_fallback_enumerates_areas() {
        let router = Router::new(tables(), Vec::new());
        let response = router.dispatch(&ctx(Method::GET, "/_apis")).expect("handled");
        let body = response.body.expect("body");
        assert_eq!(body["count"], 7);
    }

    #[test]
    fn test_legacy_fallback_answers_connection_data() {
        let router = Router::new(tables(), Vec::new());
        let response = router
            .dispatch(&ctx(Method::GET, "/_apis/connectiondata"))
            .expect("handled");
        let body = response.body.expect("body");
        assert!(body["authenticatedUser"]["id"].is_string());
        assert_eq!(body["authenticatedUser"]["id"], body["authorizedUser"]["id"]);
    }

    #[test]
    fn test_unmatched_request_is_not_handled() {
        let router = Router::new(tables(), Vec::new());
        assert!(router.dispatch(&ctx(Method::GET, "/nothing/here")).is_none());
    }

    #[test]
    fn test_handler_error_maps_through_taxonomy() {
        let action: RouteAction = Arc::new(|_, _| Err(MockError::not_found("thing", "9")));
        let router = Router::new(
            tables(),
            vec![Route::exact(Method::GET, "/thing", "thing.get", action)],
        );
        let response = router.dispatch(&ctx(Method::GET, "/thing")).expect("handled");
        assert_eq!(response.status, ResponseStatus::NotFound);
    }

    #[test]
    fn test_handler_panic_becomes_internal_error() {
        let action: RouteAction = Arc::new(|_, _| panic!("boom"));
        let router = Router::new(
            tables(),
            vec![Route::exact(Method::GET, "/thing", "thing.get", action)],
        );
        let response = router.dispatch(&ctx(Method::GET, "/thing")).expect("handled");
        assert_eq!(response.status, ResponseStatus::InternalError);
        let body = response.body.expect("body");
        assert_eq!(body["message"], "internal server error");
    }
}
