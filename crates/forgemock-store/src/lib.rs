//! # forgemock-store
//!
//! The entity store and deferred-mutation scheduler for the forgemock
//! mock server.
//!
//! - [`MockStore`] owns all mutable mock state (builds, build
//!   definitions, task definitions, work items, extensions) behind typed
//!   accessors, seeded from a fixed census and restorable via
//!   [`MockStore::clear_all`].
//! - [`DeferredTasks`] schedules fire-and-forget deferred mutations (the
//!   extension self-heal) and guarantees none survive shutdown.
//!
//! Nothing in this crate knows about HTTP; handlers hold an
//! `Arc<MockStore>` and go through the accessors.

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_name_repetitions)]

mod deferred;
pub mod seed;
mod store;

pub use deferred::DeferredTasks;
pub use seed::{
    SeedData, SAMPLE_PROJECT, SAMPLE_PROJECT_ID, SELF_HEAL_EXTENSION_ID, SELF_HEAL_PUBLISHER,
};
pub use store::MockStore;
