//! Build and build-definition entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildStatus {
    /// Queued but not yet running.
    NotStarted,
    /// Currently running.
    InProgress,
    /// Finished, see [`BuildResult`].
    Completed,
}

/// Outcome of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildResult {
    /// No outcome yet (build still queued or running).
    None,
    /// Completed successfully.
    Succeeded,
    /// Completed with failures.
    Failed,
    /// Canceled before completion.
    Canceled,
}

/// The id+name snapshot of the definition a build was queued from.
///
/// A snapshot, not a live reference: the definition must have existed when
/// the build was created, but the snapshot is never re-validated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionRef {
    /// Definition id at queue time.
    pub id: i32,
    /// Definition name at queue time.
    pub name: String,
}

/// The project a build or definition belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Project id (a GUID string on the wire).
    pub id: String,
    /// Project name.
    pub name: String,
}

/// A queued or finished build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    /// Unique, monotonically assigned id.
    pub id: i32,
    /// Derived as `<definitionName>_<epoch-millis>` at queue time.
    pub build_number: String,
    /// Lifecycle status.
    pub status: BuildStatus,
    /// Outcome, `none` until completed.
    pub result: BuildResult,
    /// When the build was queued.
    pub queue_time: DateTime<Utc>,
    /// When the build started running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// When the build finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_time: Option<DateTime<Utc>>,
    /// Definition snapshot.
    pub definition: DefinitionRef,
    /// Owning project.
    pub project: ProjectRef,
    /// Resource URL of this build.
    pub url: String,
}

/// The repository a definition builds from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Repository id.
    pub id: String,
    /// Repository name.
    pub name: String,
    /// Repository type, e.g. `"TfsGit"`.
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// One named phase of a definition's process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPhase {
    /// Phase display name.
    pub name: String,
    /// Step descriptors, left schema-less.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<serde_json::Value>,
}

/// The process section of a definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildProcess {
    /// Ordered phases.
    pub phases: Vec<BuildPhase>,
}

/// A build definition.
///
/// `(project, name)` pairs are not required to be unique; `id` always is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDefinition {
    /// Unique definition id.
    pub id: i32,
    /// Definition name.
    pub name: String,
    /// Owning project name.
    pub project: String,
    /// Definition revision counter.
    pub revision: i32,
    /// Source repository.
    pub repository: RepositoryRef,
    /// Optional process section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process: Option<BuildProcess>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_camel_case() {
        assert_eq!(
            serde_json::to_value(BuildStatus::NotStarted).expect("serialize"),
            "notStarted"
        );
        assert_eq!(
            serde_json::to_value(BuildStatus::InProgress).expect("serialize"),
            "inProgress"
        );
        assert_eq!(
            serde_json::to_value(BuildResult::Succeeded).expect("serialize"),
            "succeeded"
        );
    }

    #[test]
    fn test_build_wire_shape() {
        let build = Build {
            id: 5,
            build_number: "CI_1700000000000".to_string(),
            status: BuildStatus::InProgress,
            result: BuildResult::None,
            queue_time: Utc::now(),
            start_time: None,
            finish_time: None,
            definition: DefinitionRef {
                id: 1,
                name: "CI".to_string(),
            },
            project: ProjectRef {
                id: "c4f9a3b1-0000-0000-0000-000000000001".to_string(),
                name: "SampleProject".to_string(),
            },
            url: "http://localhost:8080/_apis/build/builds/5".to_string(),
        };

        let json = serde_json::to_value(&build).expect("serialize");
        assert_eq!(json["buildNumber"], "CI_1700000000000");
        assert_eq!(json["status"], "inProgress");
        assert_eq!(json["result"], "none");
        assert_eq!(json["definition"]["id"], 1);
        // Unset optional times stay off the wire.
        assert!(json.get("finishTime").is_none());
    }

    #[test]
    fn test_repository_type_field_name() {
        let repo = RepositoryRef {
            id: "r1".to_string(),
            name: "repo".to_string(),
            repo_type: "TfsGit".to_string(),
        };
        let json = serde_json::to_value(&repo).expect("serialize");
        assert_eq!(json["type"], "TfsGit");
    }
}
