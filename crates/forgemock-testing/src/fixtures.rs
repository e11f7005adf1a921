//! Pre-built request bodies and entities for common scenarios.

use forgemock_core::entities::{TaskDefinition, TaskVersion};
use serde_json::{json, Value};

/// The body that queues a build from the given definition.
#[must_use]
pub fn queue_build_body(definition_id: i32) -> Value {
    json!({ "definition": { "id": definition_id } })
}

/// A JSON-patch add operation targeting a work-item field.
#[must_use]
pub fn add_field_op(field: &str, value: &str) -> Value {
    json!({ "op": "add", "path": format!("/fields/{field}"), "value": value })
}

/// A minimal valid task definition with the given id and name.
#[must_use]
pub fn sample_task(id: &str, name: &str) -> TaskDefinition {
    TaskDefinition {
        id: id.to_string(),
        name: name.to_string(),
        friendly_name: name.to_string(),
        description: None,
        category: Some("Utility".to_string()),
        version: TaskVersion::new(1, 0, 0),
        inputs: None,
        execution: json!({ "Node10": { "target": "index.js" } }),
    }
}

/// [`sample_task`] as a request body.
#[must_use]
pub fn sample_task_body(id: &str, name: &str) -> Value {
    serde_json::to_value(sample_task(id, name)).unwrap_or(Value::Null)
}
