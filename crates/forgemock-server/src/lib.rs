//! # forgemock-server
//!
//! Router, resource handlers, and HTTP shell for the forgemock mock
//! server.
//!
//! The dispatch pipeline:
//!
//! ```text
//! socket -> RequestContext -> auth gate -> Router.dispatch
//!        -> handler -> MockStore -> ApiResponse -> JSON + CORS headers
//! ```
//!
//! The [`Router`] owns all matching - an ordered, first-match-wins list
//! of exact and regex routes, plus discovery-protocol emulation and
//! legacy fallback paths. The axum shell is deliberately thin: a single
//! catch-all fallback feeding the router.
//!
//! # Quick Start
//!
//! ```no_run
//! use forgemock_server::{MockServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     MockServer::new(ServerConfig::new().addr("127.0.0.1:8080"))
//!         .serve()
//!         .await
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod context;
pub mod handlers;
pub mod router;
pub mod shell;

pub use context::RequestContext;
pub use handlers::{
    BuildHandler, DistributedTaskHandler, ExtensionHandler, LocationHandler, WorkItemHandler,
};
pub use router::{HandlerResult, Route, RouteAction, RouteMatch, RoutePattern, Router};
pub use shell::{MockServer, ServerConfig};

/// The path segment that marks platform API routes.
pub const API_MARKER: &str = "_apis";
