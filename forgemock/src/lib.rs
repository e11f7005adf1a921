//! # forgemock
//!
//! An in-process mock server for a hosted build/work-tracking platform's
//! REST API, reproducing the platform's two-phase service-discovery
//! protocol bit-for-bit plus enough of the functional surface (builds,
//! build definitions, work items, extensions, distributed-task
//! definitions) to make real client code path-correct.
//!
//! ## Quick Start
//!
//! ```no_run
//! use forgemock::{MockServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     MockServer::new(ServerConfig::new().addr("127.0.0.1:8080"))
//!         .serve()
//!         .await
//! }
//! ```
//!
//! ## In tests
//!
//! ```rust
//! use forgemock::testing::{TestRequest, TestServer};
//!
//! let server = TestServer::new();
//! let response = server.handle(&TestRequest::get("/_apis/resourceareas").build());
//! assert_eq!(response.status.code(), 200);
//! ```
//!
//! ## Crate Organization
//!
//! - [`forgemock_core`] - Entities, envelopes, discovery tables, errors
//! - [`forgemock_store`] - The entity store and deferred scheduler
//! - [`mod@forgemock_server`] - Router, resource handlers, HTTP shell
//! - [`forgemock_testing`] - In-process harness and fixtures

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_name_repetitions)]

// Re-export all public items from core
pub use forgemock_core::*;

// Re-export server types
pub use forgemock_server::{
    BuildHandler, DistributedTaskHandler, ExtensionHandler, LocationHandler, MockServer,
    RequestContext, Route, RouteMatch, Router, ServerConfig, WorkItemHandler, API_MARKER,
};

// Re-export store types
pub use forgemock_store::{DeferredTasks, MockStore, SeedData};

pub mod prelude;

/// Server module re-exports
pub mod server {
    //! Router, handlers, and shell types.
    pub use forgemock_server::*;
}

/// Store module re-exports
pub mod store {
    //! Entity store and scheduler types.
    pub use forgemock_store::*;
}

/// Testing module re-exports
pub mod testing {
    //! In-process harness and fixtures.
    pub use forgemock_testing::*;
}
