//! Work-item handler.
//!
//! Creation and update both take JSON-patch-style documents; the update
//! contract is merge-not-replace, so fields the document doesn't mention
//! survive. The query endpoint returns a fixed-shape envelope and does
//! not evaluate a real query language.

use std::sync::Arc;

use axum::http::Method;
use chrono::Utc;
use forgemock_core::entities::{apply_field_patches, PatchOperation, WorkItem};
use forgemock_core::envelope::ApiResponse;
use forgemock_core::error::MockError;
use forgemock_store::MockStore;
use serde_json::json;
use tracing::info;

use super::action;
use crate::context::RequestContext;
use crate::router::{HandlerResult, Route, RouteMatch};

/// How many work items the fixed query envelope references.
const QUERY_RESULT_LIMIT: usize = 5;

/// Handler for the wit area.
#[derive(Debug)]
pub struct WorkItemHandler {
    store: Arc<MockStore>,
}

impl WorkItemHandler {
    /// Create the handler over the entity store.
    #[must_use]
    pub fn new(store: Arc<MockStore>) -> Arc<Self> {
        Arc::new(Self { store })
    }

    /// The routes this handler answers.
    #[must_use]
    pub fn routes(self: &Arc<Self>) -> Vec<Route> {
        vec![
            Route::pattern(
                Method::GET,
                r"(?i)^/_apis/wit/workitems/(\d+)$",
                "wit.get",
                action(self, Self::get),
            ),
            Route::pattern(
                Method::POST,
                r"(?i)^/_apis/wit/workitems/\$([^/]+)$",
                "wit.create",
                action(self, Self::create),
            ),
            Route::pattern(
                Method::PATCH,
                r"(?i)^/_apis/wit/workitems/(\d+)$",
                "wit.update",
                action(self, Self::update),
            ),
            Route::exact(
                Method::POST,
                "/_apis/wit/wiql",
                "wit.query",
                action(self, Self::query),
            ),
        ]
    }

    /// `GET /_apis/wit/workitems/{id}`.
    fn get(&self, _ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let id = parse_id(matched)?;
        let item = self
            .store
            .find_work_item(id)
            .ok_or_else(|| MockError::not_found("work item", id.to_string()))?;
        Ok(ApiResponse::ok_json(&item))
    }

    /// `POST /_apis/wit/workitems/${type}` - create from a patch document.
    fn create(&self, ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let item_type = matched
            .get(1)
            .ok_or_else(|| MockError::validation("work item type expected in path"))?;
        let ops = parse_patch_document(ctx)?;

        let now = Utc::now().to_rfc3339();
        let mut fields = serde_json::Map::new();
        fields.insert("System.WorkItemType".to_string(), json!(item_type));
        fields.insert("System.CreatedDate".to_string(), json!(now.clone()));
        fields.insert("System.ChangedDate".to_string(), json!(now));
        fields.insert("System.State".to_string(), json!("New"));
        apply_field_patches(&mut fields, &ops);

        let id = self.store.allocate_work_item_id();
        let item = WorkItem {
            id,
            rev: 1,
            fields,
            url: format!("{}/_apis/wit/workItems/{id}", self.store.base_url()),
        };
        self.store.insert_work_item(item.clone());
        info!(work_item = id, item_type, "created work item");
        Ok(ApiResponse::created_json(&item))
    }

    /// `PATCH /_apis/wit/workitems/{id}` - merge onto the existing map.
    fn update(&self, ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let id = parse_id(matched)?;
        let ops = parse_patch_document(ctx)?;

        let updated = self
            .store
            .modify_work_item(id, |item| {
                apply_field_patches(&mut item.fields, &ops);
                item.fields
                    .insert("System.ChangedDate".to_string(), json!(Utc::now().to_rfc3339()));
                item.rev += 1;
            })
            .ok_or_else(|| MockError::not_found("work item", id.to_string()))?;
        info!(work_item = id, rev = updated.rev, "updated work item");
        Ok(ApiResponse::ok_json(&updated))
    }

    /// `POST /_apis/wit/wiql` - fixed-shape result referencing the first
    /// few stored items.
    fn query(&self, _ctx: &RequestContext, _m: &RouteMatch) -> HandlerResult {
        let refs: Vec<_> = self
            .store
            .work_items()
            .into_iter()
            .take(QUERY_RESULT_LIMIT)
            .map(|item| json!({ "id": item.id, "url": item.url }))
            .collect();

        Ok(ApiResponse::ok(json!({
            "queryType": "flat",
            "queryResultType": "workItem",
            "asOf": Utc::now().to_rfc3339(),
            "columns": [
                { "referenceName": "System.Id", "name": "ID" },
                { "referenceName": "System.Title", "name": "Title" },
                { "referenceName": "System.State", "name": "State" }
            ],
            "workItems": refs,
        })))
    }
}

fn parse_id(matched: &RouteMatch) -> Result<i32, MockError> {
    matched
        .get(1)
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| MockError::validation("numeric work item id expected in path"))
}

fn parse_patch_document(ctx: &RequestContext) -> Result<Vec<PatchOperation>, MockError> {
    let body = ctx
        .body
        .clone()
        .ok_or_else(|| MockError::validation("patch document body is required"))?;
    serde_json::from_value(body)
        .map_err(|e| MockError::validation(format!("malformed patch document: {e}")))
}
