//! Distributed-task definition entities.

use serde::{Deserialize, Serialize};

/// Three-part version of a task definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Patch version.
    pub patch: u32,
}

impl TaskVersion {
    /// Build a version from parts.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

/// A distributed-task definition.
///
/// `id` is a free-form string here; the store keeps at most one definition
/// per id at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    /// Task id.
    pub id: String,
    /// Short machine name.
    pub name: String,
    /// Display name.
    pub friendly_name: String,
    /// Longer description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Catalog category, e.g. `"Build"` or `"Utility"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Definition version.
    pub version: TaskVersion,
    /// Input descriptors, left schema-less.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<serde_json::Value>,
    /// Execution descriptor, left schema-less.
    pub execution: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_definition_wire_shape() {
        let task = TaskDefinition {
            id: "task-cli".to_string(),
            name: "CmdLine".to_string(),
            friendly_name: "Command Line".to_string(),
            description: None,
            category: Some("Utility".to_string()),
            version: TaskVersion::new(2, 1, 0),
            inputs: None,
            execution: serde_json::json!({ "Node": { "target": "cli.js" } }),
        };

        let json = serde_json::to_value(&task).expect("serialize");
        assert_eq!(json["friendlyName"], "Command Line");
        assert_eq!(json["version"]["major"], 2);
        assert_eq!(json["execution"]["Node"]["target"], "cli.js");
        assert!(json.get("description").is_none());
    }
}
