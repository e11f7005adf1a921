//! Build and build-definition handler.
//!
//! Builds exist root-scoped and project-scoped; the two listing routes
//! diverge on purpose (root with no filter returns everything,
//! project-scoped always filters) because client code paths depend on
//! the distinction.

use std::collections::HashSet;
use std::sync::Arc;

use axum::http::Method;
use chrono::Utc;
use forgemock_core::entities::{Build, BuildResult, BuildStatus, DefinitionRef, ProjectRef};
use forgemock_core::envelope::{ApiResponse, ListEnvelope};
use forgemock_core::error::MockError;
use forgemock_store::{MockStore, SAMPLE_PROJECT, SAMPLE_PROJECT_ID};
use tracing::info;
use uuid::Uuid;

use super::action;
use crate::context::RequestContext;
use crate::router::{HandlerResult, Route, RouteMatch};

/// Default page size for build listing.
const DEFAULT_TOP: usize = 10;

/// Handler for the build area.
#[derive(Debug)]
pub struct BuildHandler {
    store: Arc<MockStore>,
}

impl BuildHandler {
    /// Create the handler over the entity store.
    #[must_use]
    pub fn new(store: Arc<MockStore>) -> Arc<Self> {
        Arc::new(Self { store })
    }

    /// The routes this handler answers, most specific first.
    #[must_use]
    pub fn routes(self: &Arc<Self>) -> Vec<Route> {
        vec![
            Route::pattern(
                Method::GET,
                r"^/(?:([^/]+)/)?_apis/build/builds/(\d+)$",
                "build.get",
                action(self, Self::get_build),
            ),
            Route::exact(
                Method::GET,
                "/_apis/build/builds",
                "build.list_root",
                action(self, Self::list_builds_root),
            ),
            Route::pattern(
                Method::GET,
                r"^/([^/]+)/_apis/build/builds$",
                "build.list_project",
                action(self, Self::list_builds_project),
            ),
            Route::exact(
                Method::POST,
                "/_apis/build/builds",
                "build.queue_root",
                action(self, Self::queue_build),
            ),
            Route::pattern(
                Method::POST,
                r"^/([^/]+)/_apis/build/builds$",
                "build.queue_project",
                action(self, Self::queue_build),
            ),
            Route::pattern(
                Method::GET,
                r"^/(?:([^/]+)/)?_apis/build/definitions/(\d+)$",
                "build.definition_get",
                action(self, Self::get_definition),
            ),
            Route::pattern(
                Method::GET,
                r"^/(?:([^/]+)/)?_apis/build/definitions$",
                "build.definition_list",
                action(self, Self::list_definitions),
            ),
        ]
    }

    /// Root-scoped listing: no project filter means all builds.
    fn list_builds_root(&self, ctx: &RequestContext, _m: &RouteMatch) -> HandlerResult {
        Ok(self.list_builds(ctx, ctx.query("project")))
    }

    /// Project-scoped listing: always filters by the path's project.
    fn list_builds_project(&self, ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        Ok(self.list_builds(ctx, matched.get(1)))
    }

    fn list_builds(&self, ctx: &RequestContext, project: Option<&str>) -> ApiResponse {
        let definition_ids: Option<HashSet<i32>> = ctx.query("definitions").map(|raw| {
            raw.split(',')
                .filter_map(|part| part.trim().parse().ok())
                .collect()
        });
        let top = ctx.query_usize("$top").unwrap_or(DEFAULT_TOP);

        let builds: Vec<Build> = self
            .store
            .builds()
            .into_iter()
            .filter(|b| project.is_none_or(|p| b.project.name == p))
            .filter(|b| {
                definition_ids
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&b.definition.id))
            })
            .take(top)
            .collect();

        ListEnvelope::new(builds).into()
    }

    /// `GET .../build/builds/{id}`.
    fn get_build(&self, _ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let id = parse_id(matched.get(2))?;
        let build = self
            .store
            .find_build(id)
            .ok_or_else(|| MockError::not_found("build", id.to_string()))?;
        Ok(ApiResponse::ok_json(&build))
    }

    /// `POST .../build/builds` - queue a new build.
    fn queue_build(&self, ctx: &RequestContext, _m: &RouteMatch) -> HandlerResult {
        let definition_id = ctx
            .body
            .as_ref()
            .and_then(|body| body.pointer("/definition/id"))
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| MockError::validation("definition id is required to queue a build"))?;
        #[allow(clippy::cast_possible_truncation)]
        let definition_id = definition_id as i32;

        let definition = self
            .store
            .find_definition(definition_id)
            .ok_or_else(|| MockError::not_found("build definition", definition_id.to_string()))?;

        let now = Utc::now();
        let id = self.store.allocate_build_id();
        let build = Build {
            id,
            build_number: format!("{}_{}", definition.name, now.timestamp_millis()),
            status: BuildStatus::InProgress,
            result: BuildResult::None,
            queue_time: now,
            start_time: Some(now),
            finish_time: None,
            definition: DefinitionRef {
                id: definition.id,
                name: definition.name.clone(),
            },
            project: project_ref(&definition.project),
            url: format!("{}/_apis/build/builds/{id}", self.store.base_url()),
        };
        self.store.insert_build(build.clone());
        info!(build = id, definition = definition_id, "queued build");
        Ok(ApiResponse::created_json(&build))
    }

    /// `GET .../build/definitions` - unscoped listing is deliberately empty.
    fn list_definitions(&self, ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let project = matched.get(1).or_else(|| ctx.query("project"));
        let name_filter = ctx.query("name");

        // Broad unscoped enumeration is invalid by policy; answer empty
        // rather than leaking the full set.
        if project.is_none() && name_filter.is_none() {
            return Ok(ListEnvelope::<forgemock_core::BuildDefinition>::new(Vec::new()).into());
        }

        let definitions: Vec<_> = self
            .store
            .definitions()
            .into_iter()
            .filter(|d| project.is_none_or(|p| d.project == p))
            .filter(|d| name_filter.is_none_or(|n| d.name.contains(n)))
            .collect();
        Ok(ListEnvelope::new(definitions).into())
    }

    /// `GET .../build/definitions/{id}`.
    fn get_definition(&self, _ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let id = parse_id(matched.get(2))?;
        let definition = self
            .store
            .find_definition(id)
            .ok_or_else(|| MockError::not_found("build definition", id.to_string()))?;
        Ok(ApiResponse::ok_json(&definition))
    }
}

fn parse_id(raw: Option<&str>) -> Result<i32, MockError> {
    raw.and_then(|r| r.parse().ok())
        .ok_or_else(|| MockError::validation("numeric id expected in path"))
}

fn project_ref(name: &str) -> ProjectRef {
    let id = if name == SAMPLE_PROJECT {
        SAMPLE_PROJECT_ID.to_string()
    } else {
        Uuid::new_v4().to_string()
    };
    ProjectRef {
        id,
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forgemock_core::discovery::DiscoveryTables;
    use forgemock_core::envelope::ResponseStatus;
    use crate::router::Router;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn setup() -> (Router, Arc<MockStore>) {
        let store = Arc::new(MockStore::new("http://localhost:8080"));
        let handler = BuildHandler::new(Arc::clone(&store));
        let tables = Arc::new(DiscoveryTables::new("http://localhost:8080"));
        (Router::new(tables, handler.routes()), store)
    }

    fn get(path: &str, query: Option<&str>) -> RequestContext {
        RequestContext::new(Method::GET, path, query, None, None)
    }

    fn post(path: &str, body: serde_json::Value) -> RequestContext {
        RequestContext::new(Method::POST, path, None, None, Some(body))
    }

    #[test]
    fn test_root_listing_without_filter_returns_all() {
        let (router, _store) = setup();
        let body = router
            .dispatch(&get("/_apis/build/builds", None))
            .expect("handled")
            .body
            .expect("body");
        assert_eq!(body["count"], 2);
    }

    #[test]
    fn test_project_listing_always_filters() {
        let (router, _store) = setup();
        let body = router
            .dispatch(&get("/OtherProject/_apis/build/builds", None))
            .expect("handled")
            .body
            .expect("body");
        assert_eq!(body["count"], 0);

        let body = router
            .dispatch(&get("/SampleProject/_apis/build/builds", None))
            .expect("handled")
            .body
            .expect("body");
        assert_eq!(body["count"], 2);
    }

    #[test]
    fn test_definitions_filter_accepts_comma_separated_ids() {
        let (router, _store) = setup();
        let body = router
            .dispatch(&get("/_apis/build/builds", Some("definitions=1,99")))
            .expect("handled")
            .body
            .expect("body");
        assert_eq!(body["count"], 2);

        let body = router
            .dispatch(&get("/_apis/build/builds", Some("definitions=99")))
            .expect("handled")
            .body
            .expect("body");
        assert_eq!(body["count"], 0);
    }

    #[test]
    fn test_top_truncates_and_count_reflects_returned() {
        let (router, _store) = setup();
        let body = router
            .dispatch(&get("/_apis/build/builds", Some("$top=1")))
            .expect("handled")
            .body
            .expect("body");
        assert_eq!(body["count"], 1);
        assert_eq!(body["value"].as_array().expect("value").len(), 1);
    }

    #[test]
    fn test_queue_build_creates_in_progress_build() {
        let (router, store) = setup();
        let response = router
            .dispatch(&post(
                "/_apis/build/builds",
                json!({ "definition": { "id": 1 } }),
            ))
            .expect("handled");

        assert_eq!(response.status, ResponseStatus::Created);
        let body = response.body.expect("body");
        assert!(body["buildNumber"]
            .as_str()
            .expect("buildNumber")
            .starts_with("Sample Build Definition_"));
        assert_eq!(body["status"], "inProgress");
        assert_eq!(body["result"], "none");
        assert_eq!(store.builds().len(), 3);
    }

    #[test]
    fn test_queue_build_without_definition_id_is_bad_request() {
        let (router, store) = setup();
        let response = router
            .dispatch(&post("/_apis/build/builds", json!({})))
            .expect("handled");
        assert_eq!(response.status, ResponseStatus::BadRequest);
        assert_eq!(store.builds().len(), 2);
    }

    #[test]
    fn test_queue_build_with_unknown_definition_is_not_found_and_pure() {
        let (router, store) = setup();
        let before = store.builds().len();
        let response = router
            .dispatch(&post(
                "/_apis/build/builds",
                json!({ "definition": { "id": 424242 } }),
            ))
            .expect("handled");
        assert_eq!(response.status, ResponseStatus::NotFound);
        assert_eq!(store.builds().len(), before);
    }

    #[test]
    fn test_get_build_by_id() {
        let (router, _store) = setup();
        let body = router
            .dispatch(&get("/_apis/build/builds/1", None))
            .expect("handled")
            .body
            .expect("body");
        assert_eq!(body["id"], 1);
        assert_eq!(body["status"], "completed");
    }

    #[test]
    fn test_unscoped_definition_listing_is_empty_by_policy() {
        let (router, _store) = setup();
        let body = router
            .dispatch(&get("/_apis/build/definitions", None))
            .expect("handled")
            .body
            .expect("body");
        assert_eq!(body["count"], 0);
    }

    #[test]
    fn test_definition_listing_by_name_substring() {
        let (router, _store) = setup();
        let body = router
            .dispatch(&get("/_apis/build/definitions", Some("name=Sample")))
            .expect("handled")
            .body
            .expect("body");
        assert_eq!(body["count"], 1);
        assert_eq!(body["value"][0]["name"], "Sample Build Definition");
    }

    #[test]
    fn test_definition_listing_by_project_path() {
        let (router, _store) = setup();
        let body = router
            .dispatch(&get("/SampleProject/_apis/build/definitions", None))
            .expect("handled")
            .body
            .expect("body");
        assert_eq!(body["count"], 2);
    }

    #[test]
    fn test_get_definition_by_id() {
        let (router, _store) = setup();
        let body = router
            .dispatch(&get("/_apis/build/definitions/2", None))
            .expect("handled")
            .body
            .expect("body");
        assert_eq!(body["name"], "Nightly Packaging");
        assert!(body["process"]["phases"].is_array());
    }
}
