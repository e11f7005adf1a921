//! Distributed-task definition handler.

use std::sync::Arc;

use axum::http::Method;
use forgemock_core::entities::TaskDefinition;
use forgemock_core::envelope::{ApiResponse, ListEnvelope};
use forgemock_core::error::MockError;
use forgemock_store::MockStore;
use tracing::info;

use super::action;
use crate::context::RequestContext;
use crate::router::{HandlerResult, Route, RouteMatch};

/// Handler for the distributedtask area.
#[derive(Debug)]
pub struct DistributedTaskHandler {
    store: Arc<MockStore>,
}

impl DistributedTaskHandler {
    /// Create the handler over the entity store.
    #[must_use]
    pub fn new(store: Arc<MockStore>) -> Arc<Self> {
        Arc::new(Self { store })
    }

    /// The routes this handler answers.
    #[must_use]
    pub fn routes(self: &Arc<Self>) -> Vec<Route> {
        vec![
            Route::exact(
                Method::GET,
                "/_apis/distributedtask/tasks",
                "task.list",
                action(self, Self::list),
            ),
            Route::pattern(
                Method::GET,
                r"^/_apis/distributedtask/tasks/([^/]+)$",
                "task.get",
                action(self, Self::get),
            ),
            Route::exact(
                Method::POST,
                "/_apis/distributedtask/tasks",
                "task.create",
                action(self, Self::create),
            ),
            Route::pattern(
                Method::PATCH,
                r"^/_apis/distributedtask/tasks/([^/]+)$",
                "task.update",
                action(self, Self::update),
            ),
            Route::pattern(
                Method::PUT,
                r"^/_apis/distributedtask/tasks/([^/]+)$",
                "task.upload",
                action(self, Self::upload),
            ),
            Route::pattern(
                Method::DELETE,
                r"^/_apis/distributedtask/tasks/([^/]+)$",
                "task.delete",
                action(self, Self::delete),
            ),
        ]
    }

    /// `GET /_apis/distributedtask/tasks` - optionally filtered by
    /// `taskId`; ids are unique so the filtered result is zero or one.
    fn list(&self, ctx: &RequestContext, _m: &RouteMatch) -> HandlerResult {
        let tasks: Vec<TaskDefinition> = match ctx.query("taskId") {
            Some(id) => self.store.find_task(id).into_iter().collect(),
            None => self.store.task_definitions(),
        };
        Ok(ListEnvelope::new(tasks).into())
    }

    /// `GET /_apis/distributedtask/tasks/{id}` - always an array, empty
    /// when the id is unknown; callers' contract expects a list even for
    /// point lookups.
    fn get(&self, _ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let id = required_id(matched)?;
        let tasks: Vec<TaskDefinition> = self.store.find_task(id).into_iter().collect();
        Ok(ListEnvelope::new(tasks).into())
    }

    /// `POST /_apis/distributedtask/tasks`.
    fn create(&self, ctx: &RequestContext, _m: &RouteMatch) -> HandlerResult {
        let task = parse_task(ctx)?;
        if task.id.is_empty() {
            return Err(MockError::validation("task definition id is required"));
        }
        info!(task = %task.id, "creating task definition");
        self.store.insert_task(task.clone());
        Ok(ApiResponse::created_json(&task))
    }

    /// `PATCH /_apis/distributedtask/tasks/{id}` - replace-or-insert
    /// keyed by the path id.
    fn update(&self, ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let id = required_id(matched)?;
        let mut task = parse_task(ctx)?;
        task.id = id.to_string();
        let replaced = self.store.replace_task(task.clone());
        info!(task = %id, replaced, "updating task definition");
        Ok(ApiResponse::ok_json(&task))
    }

    /// `PUT /_apis/distributedtask/tasks/{id}?overwrite=` - the upload
    /// contract is fire-and-forget: success answers 204 with no body.
    fn upload(&self, ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let id = required_id(matched)?;
        if self.store.task_exists(id) && !ctx.query_bool("overwrite") {
            return Err(MockError::conflict(format!(
                "task definition '{id}' already exists and overwrite is not set"
            )));
        }
        let mut task = parse_task(ctx)?;
        task.id = id.to_string();
        self.store.replace_task(task);
        info!(task = %id, "uploaded task definition");
        Ok(ApiResponse::no_content())
    }

    /// `DELETE /_apis/distributedtask/tasks/{id}`.
    fn delete(&self, _ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let id = required_id(matched)?;
        if !self.store.remove_task(id) {
            return Err(MockError::not_found("task definition", id));
        }
        info!(task = %id, "deleted task definition");
        Ok(ApiResponse::no_content())
    }
}

fn required_id<'a>(matched: &'a RouteMatch) -> Result<&'a str, MockError> {
    matched
        .get(1)
        .ok_or_else(|| MockError::validation("task id expected in path"))
}

fn parse_task(ctx: &RequestContext) -> Result<TaskDefinition, MockError> {
    let body = ctx
        .body
        .clone()
        .ok_or_else(|| MockError::validation("task definition body is required"))?;
    serde_json::from_value(body)
        .map_err(|e| MockError::validation(format!("malformed task definition: {e}")))
}
