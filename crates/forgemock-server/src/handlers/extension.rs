//! Gallery / extension-management handler.
//!
//! Most operations are plain CRUD over the extension collection. The one
//! special policy is the self-heal fixture: deleting
//! `fixture-publisher/self-heal-extension` schedules its re-creation
//! after a short delay, so validation suites that rely on its presence
//! are not permanently broken by a delete test that ran first. No other
//! identity self-heals.

use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use chrono::Utc;
use forgemock_core::entities::{Extension, ExtensionVersion, Publisher};
use forgemock_core::envelope::{ApiResponse, ListEnvelope};
use forgemock_core::error::MockError;
use forgemock_store::{
    seed, DeferredTasks, MockStore, SELF_HEAL_EXTENSION_ID, SELF_HEAL_PUBLISHER,
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::action;
use crate::context::RequestContext;
use crate::router::{HandlerResult, Route, RouteMatch};

/// Default page size for gallery listing.
const DEFAULT_TAKE: usize = 100;

/// How long the deleted fixture stays gone before re-provisioning.
const DEFAULT_SELF_HEAL_DELAY: Duration = Duration::from_millis(500);

/// Handler for the gallery and extensionmanagement areas.
#[derive(Debug)]
pub struct ExtensionHandler {
    store: Arc<MockStore>,
    deferred: Arc<DeferredTasks>,
    self_heal_delay: Duration,
}

impl ExtensionHandler {
    /// Create the handler over the entity store and deferred scheduler.
    #[must_use]
    pub fn new(store: Arc<MockStore>, deferred: Arc<DeferredTasks>) -> Arc<Self> {
        Self::with_self_heal_delay(store, deferred, DEFAULT_SELF_HEAL_DELAY)
    }

    /// Like [`new`](Self::new) with an explicit self-heal delay.
    #[must_use]
    pub fn with_self_heal_delay(
        store: Arc<MockStore>,
        deferred: Arc<DeferredTasks>,
        self_heal_delay: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            deferred,
            self_heal_delay,
        })
    }

    /// The routes this handler answers.
    #[must_use]
    pub fn routes(self: &Arc<Self>) -> Vec<Route> {
        vec![
            Route::exact(
                Method::GET,
                "/_apis/gallery/extensions",
                "gallery.list",
                action(self, Self::list),
            ),
            Route::exact(
                Method::POST,
                "/_apis/gallery/extensions",
                "gallery.publish",
                action(self, Self::publish),
            ),
            Route::pattern(
                Method::POST,
                r"^/_apis/gallery/publishers/([^/]+)/extensions/([^/]+)/share$",
                "gallery.share",
                action(self, Self::acknowledge),
            ),
            Route::pattern(
                Method::POST,
                r"^/_apis/gallery/publishers/([^/]+)/extensions/([^/]+)/unshare$",
                "gallery.unshare",
                action(self, Self::acknowledge),
            ),
            Route::pattern(
                Method::POST,
                r"^/_apis/gallery/publishers/([^/]+)/extensions/([^/]+)/validate$",
                "gallery.validate",
                action(self, Self::acknowledge),
            ),
            Route::pattern(
                Method::GET,
                r"^/_apis/gallery/publishers/([^/]+)/extensions/([^/]+)$",
                "gallery.get",
                action(self, Self::get),
            ),
            Route::pattern(
                Method::PUT,
                r"^/_apis/gallery/publishers/([^/]+)/extensions/([^/]+)$",
                "gallery.update",
                action(self, Self::update),
            ),
            Route::pattern(
                Method::DELETE,
                r"^/_apis/gallery/publishers/([^/]+)/extensions/([^/]+)$",
                "gallery.delete",
                action(self, Self::delete),
            ),
            Route::pattern(
                Method::POST,
                r"^/_apis/extensionmanagement/installedextensionsbyname/([^/]+)/([^/]+)$",
                "extmgmt.install",
                action(self, Self::install),
            ),
            Route::exact(
                Method::GET,
                "/_apis/extensionmanagement/installedextensions",
                "extmgmt.installed",
                action(self, Self::list_installed),
            ),
        ]
    }

    /// `GET /_apis/gallery/extensions` - filtered, paginated, wrapped in
    /// the nested gallery envelope.
    fn list(&self, ctx: &RequestContext, _m: &RouteMatch) -> HandlerResult {
        let search = ctx.query("searchText").map(str::to_lowercase);
        let category = ctx.query("category");
        let skip = ctx.query_usize("skip").unwrap_or(0);
        let take = ctx.query_usize("take").unwrap_or(DEFAULT_TAKE);

        let extensions: Vec<Extension> = self
            .store
            .extensions()
            .into_iter()
            .filter(|e| {
                search.as_deref().is_none_or(|needle| {
                    e.extension_name.to_lowercase().contains(needle)
                        || e.display_name.to_lowercase().contains(needle)
                        || e.short_description.to_lowercase().contains(needle)
                })
            })
            .filter(|e| category.is_none_or(|c| e.categories.iter().any(|have| have.as_str() == c)))
            .skip(skip)
            .take(take)
            .collect();

        Ok(ApiResponse::ok(json!({
            "results": [{
                "extensions": extensions,
                "resultMetadata": [{
                    "metadataType": "ResultCount",
                    "metadataItems": [{ "name": "TotalCount", "count": extensions.len() }]
                }]
            }]
        })))
    }

    /// `GET /_apis/gallery/publishers/{pub}/extensions/{ext}`.
    fn get(&self, _ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let (publisher, extension_id) = key(matched)?;
        let extension = self
            .store
            .find_extension(publisher, extension_id)
            .ok_or_else(|| not_found(publisher, extension_id))?;
        Ok(ApiResponse::ok_json(&extension))
    }

    /// `POST /_apis/gallery/extensions` - always creates a new synthetic
    /// extension.
    fn publish(&self, ctx: &RequestContext, _m: &RouteMatch) -> HandlerResult {
        let body = ctx.body.as_ref();
        let field = |name: &str| {
            body.and_then(|b| b.get(name))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };

        let extension_id = field("extensionId")
            .unwrap_or_else(|| format!("published-{}", Uuid::new_v4().simple()));
        let publisher = field("publisherName").unwrap_or_else(|| "mock-publisher".to_string());
        let display_name = field("displayName").unwrap_or_else(|| extension_id.clone());

        let extension = synthetic_extension(&publisher, &extension_id, &display_name);
        self.store.insert_extension(extension.clone());
        info!(publisher = %publisher, extension = %extension_id, "published extension");
        Ok(ApiResponse::created_json(&extension))
    }

    /// `PUT /_apis/gallery/publishers/{pub}/extensions/{ext}` -
    /// create-if-absent, else merge the version history.
    fn update(&self, ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let (publisher, extension_id) = key(matched)?;
        let version = ctx
            .body
            .as_ref()
            .and_then(|b| b.get("version"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);

        if let Some(updated) = self.store.modify_extension(publisher, extension_id, |e| {
            if let Some(version) = version.clone() {
                e.merge_version(ExtensionVersion {
                    version,
                    flags: "validated".to_string(),
                    last_updated: Utc::now(),
                });
            }
        }) {
            info!(publisher = %publisher, extension = %extension_id, "merged extension update");
            return Ok(ApiResponse::ok_json(&updated));
        }

        let mut extension = synthetic_extension(publisher, extension_id, extension_id);
        if let Some(version) = version {
            extension.versions[0].version = version;
        }
        self.store.insert_extension(extension.clone());
        info!(publisher = %publisher, extension = %extension_id, "created extension on update");
        Ok(ApiResponse::ok_json(&extension))
    }

    /// `DELETE /_apis/gallery/publishers/{pub}/extensions/{ext}`.
    fn delete(&self, _ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let (publisher, extension_id) = key(matched)?;
        self.store
            .remove_extension(publisher, extension_id)
            .ok_or_else(|| not_found(publisher, extension_id))?;
        info!(publisher = %publisher, extension = %extension_id, "deleted extension");

        if publisher == SELF_HEAL_PUBLISHER && extension_id == SELF_HEAL_EXTENSION_ID {
            let store = Arc::clone(&self.store);
            self.deferred.schedule(self.self_heal_delay, move || {
                if store
                    .find_extension(SELF_HEAL_PUBLISHER, SELF_HEAL_EXTENSION_ID)
                    .is_none()
                {
                    store.insert_extension(seed::self_heal_extension());
                    info!("re-provisioned self-heal fixture extension");
                }
            });
        }

        Ok(ApiResponse::no_content())
    }

    /// `POST .../installedextensionsbyname/{pub}/{ext}` - idempotent.
    fn install(&self, _ctx: &RequestContext, matched: &RouteMatch) -> HandlerResult {
        let (publisher, extension_id) = key(matched)?;
        if let Some(existing) = self.store.find_extension(publisher, extension_id) {
            return Ok(ApiResponse::ok_json(&existing));
        }
        let extension = synthetic_extension(publisher, extension_id, extension_id);
        self.store.insert_extension(extension.clone());
        info!(publisher = %publisher, extension = %extension_id, "installed extension");
        Ok(ApiResponse::created_json(&extension))
    }

    /// `GET /_apis/extensionmanagement/installedextensions`.
    fn list_installed(&self, _ctx: &RequestContext, _m: &RouteMatch) -> HandlerResult {
        Ok(ListEnvelope::new(self.store.extensions()).into())
    }

    /// share / unshare / validate - stateless acknowledgements.
    #[allow(clippy::unused_self)]
    fn acknowledge(&self, _ctx: &RequestContext, _m: &RouteMatch) -> HandlerResult {
        Ok(ApiResponse::ok(json!({})))
    }
}

fn key<'a>(matched: &'a RouteMatch) -> Result<(&'a str, &'a str), MockError> {
    match (matched.get(1), matched.get(2)) {
        (Some(publisher), Some(extension_id)) => Ok((publisher, extension_id)),
        _ => Err(MockError::validation(
            "publisher and extension id expected in path",
        )),
    }
}

fn not_found(publisher: &str, extension_id: &str) -> MockError {
    MockError::not_found("extension", format!("{publisher}/{extension_id}"))
}

fn synthetic_extension(publisher: &str, extension_id: &str, display_name: &str) -> Extension {
    let now = Utc::now();
    Extension {
        extension_id: extension_id.to_string(),
        extension_name: extension_id.to_string(),
        display_name: display_name.to_string(),
        short_description: format!("Mock extension {publisher}/{extension_id}"),
        publisher: Publisher {
            publisher_name: publisher.to_string(),
            display_name: publisher.to_string(),
        },
        categories: vec!["Azure Pipelines".to_string()],
        flags: "validated".to_string(),
        versions: vec![ExtensionVersion {
            version: "1.0.0".to_string(),
            flags: "validated".to_string(),
            last_updated: now,
        }],
        last_updated: now,
    }
}
