//! The entity store.
//!
//! [`MockStore`] owns every piece of mutable mock state behind typed
//! accessors and knows nothing about HTTP. Handlers receive an `Arc` of
//! the store at construction; there are no ambient singletons.
//!
//! Request handling is one-response-per-context with no parallel
//! mutation; the interior locks exist only because the shell's runtime
//! requires `Sync`, and a poisoned lock is recovered rather than
//! propagated since entity state is plain data.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use forgemock_core::entities::{Build, BuildDefinition, Extension, TaskDefinition, WorkItem};
use tracing::debug;

use crate::seed::SeedData;

/// In-memory repository of all mock-server state.
#[derive(Debug)]
pub struct MockStore {
    base_url: String,
    builds: RwLock<Vec<Build>>,
    definitions: RwLock<Vec<BuildDefinition>>,
    tasks: RwLock<Vec<TaskDefinition>>,
    work_items: RwLock<Vec<WorkItem>>,
    extensions: RwLock<Vec<Extension>>,
    next_build_id: AtomicI32,
    next_work_item_id: AtomicI32,
}

impl MockStore {
    /// Create a store seeded with the fixed census.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let store = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            builds: RwLock::new(Vec::new()),
            definitions: RwLock::new(Vec::new()),
            tasks: RwLock::new(Vec::new()),
            work_items: RwLock::new(Vec::new()),
            extensions: RwLock::new(Vec::new()),
            next_build_id: AtomicI32::new(1),
            next_work_item_id: AtomicI32::new(1),
        };
        store.apply_seed();
        store
    }

    /// The base URL entity resource URLs are derived from.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Discard all entities and re-seed.
    pub fn clear_all(&self) {
        write(&self.builds).clear();
        write(&self.definitions).clear();
        write(&self.tasks).clear();
        write(&self.work_items).clear();
        write(&self.extensions).clear();
        self.apply_seed();
        debug!("store cleared and re-seeded");
    }

    fn apply_seed(&self) {
        let seed = SeedData::new(&self.base_url);

        let max_build = seed.builds.iter().map(|b| b.id).max().unwrap_or(0);
        let max_work_item = seed.work_items.iter().map(|w| w.id).max().unwrap_or(0);
        self.next_build_id.store(max_build + 1, Ordering::SeqCst);
        self.next_work_item_id
            .store(max_work_item + 1, Ordering::SeqCst);

        *write(&self.builds) = seed.builds;
        *write(&self.definitions) = seed.definitions;
        *write(&self.tasks) = seed.tasks;
        *write(&self.work_items) = seed.work_items;
        *write(&self.extensions) = seed.extensions;
    }

    // ------------------------------------------------------------------
    // Builds
    // ------------------------------------------------------------------

    /// Snapshot of all builds, in insertion order.
    #[must_use]
    pub fn builds(&self) -> Vec<Build> {
        read(&self.builds).clone()
    }

    /// Look a build up by id.
    #[must_use]
    pub fn find_build(&self, id: i32) -> Option<Build> {
        read(&self.builds).iter().find(|b| b.id == id).cloned()
    }

    /// Reserve the next monotonically assigned build id.
    pub fn allocate_build_id(&self) -> i32 {
        self.next_build_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Append a build.
    pub fn insert_build(&self, build: Build) {
        write(&self.builds).push(build);
    }

    // ------------------------------------------------------------------
    // Build definitions
    // ------------------------------------------------------------------

    /// Snapshot of all build definitions.
    #[must_use]
    pub fn definitions(&self) -> Vec<BuildDefinition> {
        read(&self.definitions).clone()
    }

    /// Look a definition up by id.
    #[must_use]
    pub fn find_definition(&self, id: i32) -> Option<BuildDefinition> {
        read(&self.definitions).iter().find(|d| d.id == id).cloned()
    }

    // ------------------------------------------------------------------
    // Task definitions
    // ------------------------------------------------------------------

    /// Snapshot of all task definitions.
    #[must_use]
    pub fn task_definitions(&self) -> Vec<TaskDefinition> {
        read(&self.tasks).clone()
    }

    /// Look a task definition up by id.
    #[must_use]
    pub fn find_task(&self, id: &str) -> Option<TaskDefinition> {
        read(&self.tasks).iter().find(|t| t.id == id).cloned()
    }

    /// Whether a task definition with this id is stored.
    #[must_use]
    pub fn task_exists(&self, id: &str) -> bool {
        read(&self.tasks).iter().any(|t| t.id == id)
    }

    /// Append a task definition.
    pub fn insert_task(&self, task: TaskDefinition) {
        write(&self.tasks).push(task);
    }

    /// Replace the definition with the same id, or insert if absent.
    ///
    /// Returns `true` when an existing definition was replaced in place.
    pub fn replace_task(&self, task: TaskDefinition) -> bool {
        let mut tasks = write(&self.tasks);
        if let Some(existing) = tasks.iter_mut().find(|t| t.id == task.id) {
            *existing = task;
            true
        } else {
            tasks.push(task);
            false
        }
    }

    /// Remove a task definition by id.
    ///
    /// Returns `true` when something was removed.
    pub fn remove_task(&self, id: &str) -> bool {
        let mut tasks = write(&self.tasks);
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        tasks.len() < before
    }

    // ------------------------------------------------------------------
    // Work items
    // ------------------------------------------------------------------

    /// Snapshot of all work items, in insertion order.
    #[must_use]
    pub fn work_items(&self) -> Vec<WorkItem> {
        read(&self.work_items).clone()
    }

    /// Look a work item up by id.
    #[must_use]
    pub fn find_work_item(&self, id: i32) -> Option<WorkItem> {
        read(&self.work_items).iter().find(|w| w.id == id).cloned()
    }

    /// Reserve the next sequential work-item id.
    pub fn allocate_work_item_id(&self) -> i32 {
        self.next_work_item_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Append a work item.
    pub fn insert_work_item(&self, item: WorkItem) {
        write(&self.work_items).push(item);
    }

    /// Mutate a work item in place, returning the updated copy.
    pub fn modify_work_item<F>(&self, id: i32, f: F) -> Option<WorkItem>
    where
        F: FnOnce(&mut WorkItem),
    {
        let mut items = write(&self.work_items);
        let item = items.iter_mut().find(|w| w.id == id)?;
        f(item);
        Some(item.clone())
    }

    // ------------------------------------------------------------------
    // Extensions
    // ------------------------------------------------------------------

    /// Snapshot of all extensions, in insertion order.
    #[must_use]
    pub fn extensions(&self) -> Vec<Extension> {
        read(&self.extensions).clone()
    }

    /// Look an extension up by its `(publisher, id)` key.
    #[must_use]
    pub fn find_extension(&self, publisher: &str, extension_id: &str) -> Option<Extension> {
        read(&self.extensions)
            .iter()
            .find(|e| e.has_key(publisher, extension_id))
            .cloned()
    }

    /// Append an extension.
    pub fn insert_extension(&self, extension: Extension) {
        write(&self.extensions).push(extension);
    }

    /// Mutate an extension in place, returning the updated copy.
    pub fn modify_extension<F>(&self, publisher: &str, extension_id: &str, f: F) -> Option<Extension>
    where
        F: FnOnce(&mut Extension),
    {
        let mut extensions = write(&self.extensions);
        let extension = extensions
            .iter_mut()
            .find(|e| e.has_key(publisher, extension_id))?;
        f(extension);
        Some(extension.clone())
    }

    /// Remove an extension by key, returning the removed entity.
    pub fn remove_extension(&self, publisher: &str, extension_id: &str) -> Option<Extension> {
        let mut extensions = write(&self.extensions);
        let index = extensions
            .iter()
            .position(|e| e.has_key(publisher, extension_id))?;
        Some(extensions.remove(index))
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{SELF_HEAL_EXTENSION_ID, SELF_HEAL_PUBLISHER};
    use forgemock_core::entities::TaskVersion;
    use pretty_assertions::assert_eq;

    fn store() -> MockStore {
        MockStore::new("http://localhost:8080")
    }

    fn task(id: &str, name: &str) -> TaskDefinition {
        TaskDefinition {
            id: id.to_string(),
            name: name.to_string(),
            friendly_name: name.to_string(),
            description: None,
            category: None,
            version: TaskVersion::new(1, 0, 0),
            inputs: None,
            execution: serde_json::json!({}),
        }
    }

    #[test]
    fn test_new_store_carries_seed_census() {
        let store = store();
        assert_eq!(store.builds().len(), 2);
        assert_eq!(store.definitions().len(), 2);
        assert_eq!(store.task_definitions().len(), 2);
        assert_eq!(store.work_items().len(), 2);
        assert_eq!(store.extensions().len(), 3);
    }

    #[test]
    fn test_build_ids_allocate_above_seed() {
        let store = store();
        assert_eq!(store.allocate_build_id(), 3);
        assert_eq!(store.allocate_build_id(), 4);
    }

    #[test]
    fn test_clear_all_restores_seed_census_and_counters() {
        let store = store();
        store.remove_task("d9bafed4-0b18-4f58-968d-86655b4d2ce9");
        let _ = store.allocate_build_id();
        let _ = store.remove_extension(SELF_HEAL_PUBLISHER, SELF_HEAL_EXTENSION_ID);

        store.clear_all();

        assert_eq!(store.task_definitions().len(), 2);
        assert_eq!(store.extensions().len(), 3);
        assert_eq!(store.allocate_build_id(), 3);
    }

    #[test]
    fn test_replace_task_reports_in_place_replacement() {
        let store = store();
        assert!(!store.replace_task(task("new-task", "New")));
        assert!(store.replace_task(task("new-task", "Renamed")));
        assert_eq!(
            store.find_task("new-task").map(|t| t.name),
            Some("Renamed".to_string())
        );
        // Replacement never grows the collection.
        assert_eq!(store.task_definitions().len(), 3);
    }

    #[test]
    fn test_remove_task_only_removes_matching_id() {
        let store = store();
        assert!(!store.remove_task("does-not-exist"));
        assert!(store.remove_task("d9bafed4-0b18-4f58-968d-86655b4d2ce9"));
        assert_eq!(store.task_definitions().len(), 1);
    }

    #[test]
    fn test_modify_work_item_returns_updated_copy() {
        let store = store();
        let updated = store
            .modify_work_item(1, |item| {
                item.rev += 1;
                item.fields
                    .insert("System.Title".to_string(), serde_json::json!("edited"));
            })
            .expect("work item 1 is seeded");
        assert_eq!(updated.rev, 2);
        assert_eq!(
            store.find_work_item(1).map(|w| w.rev),
            Some(2),
            "mutation lands in the store"
        );
    }

    #[test]
    fn test_extension_lookup_is_keyed_by_publisher_and_id() {
        let store = store();
        assert!(store
            .find_extension(SELF_HEAL_PUBLISHER, SELF_HEAL_EXTENSION_ID)
            .is_some());
        assert!(store
            .find_extension("acme", SELF_HEAL_EXTENSION_ID)
            .is_none());
    }
}
