//! Work-item entity and the JSON-patch-style field updates applied to it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tracked work item.
///
/// `fields` is an open string-keyed map; updates merge into it and never
/// replace it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique, sequentially assigned id.
    pub id: i32,
    /// Revision counter, bumped on every update.
    pub rev: i32,
    /// Open field map keyed by reference names like `System.Title`.
    pub fields: Map<String, Value>,
    /// Resource URL of this work item.
    pub url: String,
}

/// One JSON-patch-style operation from a work-item patch document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchOperation {
    /// Operation kind: `add`, `replace`, `remove`, ...
    pub op: String,
    /// Target pointer, e.g. `/fields/System.Title`.
    pub path: String,
    /// Value to apply; ignored for `remove`.
    #[serde(default)]
    pub value: Value,
}

/// Apply an ordered patch document onto a field map.
///
/// Only operations targeting `/fields/...` paths are honored. `add` and
/// `replace` both set the field; `remove` deletes it; anything else is
/// skipped. Fields not named by any operation are preserved.
///
/// Returns the number of operations applied.
pub fn apply_field_patches(fields: &mut Map<String, Value>, ops: &[PatchOperation]) -> usize {
    let mut applied = 0;
    for op in ops {
        let Some(field) = op.path.strip_prefix("/fields/") else {
            continue;
        };
        match op.op.as_str() {
            "add" | "replace" => {
                fields.insert(field.to_string(), op.value.clone());
                applied += 1;
            }
            "remove" => {
                fields.remove(field);
                applied += 1;
            }
            _ => {}
        }
    }
    applied
}
