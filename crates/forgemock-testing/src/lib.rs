//! # forgemock-testing
//!
//! Testing utilities for the forgemock mock server:
//!
//! - [`TestServer`] - the full dispatch pipeline driven in-process,
//!   no sockets
//! - [`TestRequest`] - fluent [`RequestContext`] builder, credentialed
//!   by default
//! - [`fixtures`] - pre-built request bodies and entities
//!
//! # Example
//!
//! ```rust
//! use forgemock_testing::{fixtures, TestRequest, TestServer};
//!
//! let server = TestServer::new();
//! let response = server.handle(
//!     &TestRequest::post("/_apis/build/builds")
//!         .body(fixtures::queue_build_body(1))
//!         .build(),
//! );
//! assert_eq!(response.status.code(), 201);
//! ```
//!
//! [`RequestContext`]: forgemock_server::RequestContext

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod fixtures;
mod harness;

pub use harness::{TestRequest, TestServer, TEST_BASE_URL};
