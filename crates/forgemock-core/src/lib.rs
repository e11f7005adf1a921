//! # forgemock-core
//!
//! Wire-level contract types for the forgemock mock server.
//!
//! This crate provides the foundational building blocks shared by the
//! store and the server:
//!
//! - **Entities**: builds, build definitions, task definitions, work
//!   items, gallery extensions
//! - **Envelopes**: the `{count, value}` list wrapper and the enumerated
//!   response statuses
//! - **Discovery tables**: the fixed area and resource descriptor tables
//!   of the two-phase service-discovery protocol
//! - **Error handling**: the unified [`MockError`] taxonomy with rich
//!   diagnostics
//!
//! This crate is runtime-agnostic and does not depend on any async
//! runtime. The GUIDs in [`discovery`] are part of the wire contract;
//! clients hard-code them, so treat any change as a breaking one.
//!
//! # Example
//!
//! ```rust
//! use forgemock_core::discovery::{area_ids, AreaLookup, DiscoveryTables};
//!
//! let tables = DiscoveryTables::new("http://localhost:8080");
//! assert_eq!(tables.areas().len(), 7);
//!
//! match tables.area_by_id(area_ids::BUILD) {
//!     Some(AreaLookup::Full(descriptor)) => assert_eq!(descriptor.name, "build"),
//!     _ => unreachable!("build resolves to a full descriptor"),
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_name_repetitions)]

pub mod discovery;
pub mod entities;
pub mod envelope;
pub mod error;

// Re-export commonly used types at the crate root
pub use entities::{
    apply_field_patches, Build, BuildDefinition, BuildResult, BuildStatus, DefinitionRef,
    Extension, ExtensionVersion, PatchOperation, ProjectRef, Publisher, TaskDefinition,
    TaskVersion, WorkItem,
};
pub use envelope::{ApiResponse, ListEnvelope, ResponseStatus};
pub use error::MockError;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use forgemock_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::discovery::{AreaDescriptor, AreaLookup, DiscoveryTables, ResourceDescriptor};
    pub use crate::entities::*;
    pub use crate::envelope::{ApiResponse, ListEnvelope, ResponseStatus};
    pub use crate::error::MockError;
}
