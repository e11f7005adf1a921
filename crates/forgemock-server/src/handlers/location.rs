//! Location/discovery handler.
//!
//! Serves the first phase of the discovery protocol: the fixed area
//! enumeration and the by-GUID lookup with its per-GUID projection
//! policy. Also owns the health probe.

use std::sync::Arc;

use axum::http::Method;
use chrono::Utc;
use forgemock_core::discovery::DiscoveryTables;
use forgemock_core::envelope::{ApiResponse, ListEnvelope};
use forgemock_core::error::MockError;
use uuid::Uuid;

use super::action;
use crate::context::RequestContext;
use crate::router::{HandlerResult, Route, RouteMatch};

/// Handler for the Location area.
#[derive(Debug)]
pub struct LocationHandler {
    tables: Arc<DiscoveryTables>,
}

impl LocationHandler {
    /// Create the handler over the discovery tables.
    #[must_use]
    pub fn new(tables: Arc<DiscoveryTables>) -> Arc<Self> {
        Arc::new(Self { tables })
    }

    /// The routes this handler answers.
    #[must_use]
    pub fn routes(self: &Arc<Self>) -> Vec<Route> {
        vec![
            Route::pattern(
                Method::GET,
                r"(?i)^/_apis/resourceareas/?$",
                "location.areas",
                action(self, Self::list_areas),
            ),
            Route::pattern(
                Method::GET,
                r"(?i)^/_apis/resourceareas/([0-9a-f-]+)$",
                "location.area_by_id",
                action(self, Self::area_by_id),
            ),
            Route::exact(
                Method::GET,
                "/health",
                "location.health",
                action(self, Self::health),
            ),
        ]
    }

    /// `GET /_apis/resourceareas` - the fixed, ordered area set.
    fn list_areas(&self, _ctx: &RequestContext, _m: &RouteMatch) -> HandlerResult {
        Ok(ListEnvelope::new(self.tables.areas()).into())
    }

    /// `GET /_apis/resourceareas/{uuid}` - projection per the policy table.
    fn area_by_id(&self, _ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let raw = matched
            .get(1)
            .ok_or_else(|| MockError::validation("missing area id"))?;
        let id = Uuid::parse_str(raw)
            .map_err(|_| MockError::not_found("resource area", raw))?;
        let lookup = self
            .tables
            .area_by_id(id)
            .ok_or_else(|| MockError::not_found("resource area", raw))?;
        Ok(ApiResponse::ok(lookup.to_value()))
    }

    /// `GET /health`.
    fn health(&self, _ctx: &RequestContext, _m: &RouteMatch) -> HandlerResult {
        Ok(ApiResponse::ok(serde_json::json!({
            "status": "healthy",
            "timestamp": Utc::now().to_rfc3339(),
        })))
    }
}
