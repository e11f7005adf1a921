//! Resource handlers.
//!
//! Each handler owns a bounded slice of the functional surface: it
//! declares the routes it answers and implements the business logic over
//! the entity store. Handlers are constructed once with an `Arc` of their
//! collaborators and registered with the router in a fixed order.

use std::sync::Arc;

use crate::context::RequestContext;
use crate::router::{HandlerResult, RouteAction, RouteMatch};

mod build;
mod extension;
mod location;
mod task;
mod work_item;

pub use build::BuildHandler;
pub use extension::ExtensionHandler;
pub use location::LocationHandler;
pub use task::DistributedTaskHandler;
pub use work_item::WorkItemHandler;

/// Wrap a handler method as a [`RouteAction`].
///
/// Each route carries its own clone of the handler `Arc`; the closure
/// just forwards to the method.
pub(crate) fn action<H, F>(handler: &Arc<H>, f: F) -> RouteAction
where
    H: Send + Sync + 'static,
    F: Fn(&H, &RequestContext, &RouteMatch) -> HandlerResult + Send + Sync + 'static,
{
    let handler = Arc::clone(handler);
    Arc::new(move |ctx, matched| f(&handler, ctx, matched))
}
