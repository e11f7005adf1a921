//! Prelude module for convenient imports.
//!
//! Import everything you need with a single use statement:
//!
//! ```rust
//! use forgemock::prelude::*;
//!
//! let server = MockServer::new(ServerConfig::new());
//! assert_eq!(server.store().builds().len(), 2);
//! ```
//!
//! ## Included Types
//!
//! - Entities (`Build`, `BuildDefinition`, `TaskDefinition`, `WorkItem`,
//!   `Extension`)
//! - Envelopes (`ApiResponse`, `ListEnvelope`, `ResponseStatus`)
//! - Discovery tables (`DiscoveryTables`, `AreaLookup`)
//! - The error taxonomy (`MockError`)
//! - Server assembly (`MockServer`, `ServerConfig`, `Router`, `Route`)
//! - Store types (`MockStore`, `DeferredTasks`)

// Core types
pub use forgemock_core::prelude::*;

// Server types
pub use forgemock_server::{
    MockServer, RequestContext, Route, RouteMatch, RoutePattern, Router, ServerConfig,
};

// Store types
pub use forgemock_store::{DeferredTasks, MockStore, SeedData};
