//! Entity types held by the entity store.
//!
//! These are the wire shapes a platform client reads back; field names
//! serialize in the platform's native camelCase.

mod build;
mod extension;
mod task;
mod work_item;

pub use build::{
    Build, BuildDefinition, BuildPhase, BuildProcess, BuildResult, BuildStatus, DefinitionRef,
    ProjectRef, RepositoryRef,
};
pub use extension::{Extension, ExtensionVersion, Publisher};
pub use task::{TaskDefinition, TaskVersion};
pub use work_item::{apply_field_patches, PatchOperation, WorkItem};
