//! Seed data.
//!
//! The store starts from (and `clear_all` returns to) this fixed census.
//! Downstream test suites key on the identities here - definition id 1's
//! name and the self-heal fixture extension in particular - so changes
//! ripple into every client compliance test.

use chrono::{Duration, Utc};
use forgemock_core::entities::{
    Build, BuildDefinition, BuildPhase, BuildProcess, BuildResult, BuildStatus, DefinitionRef,
    Extension, ExtensionVersion, ProjectRef, Publisher, RepositoryRef, TaskDefinition, TaskVersion,
    WorkItem,
};
use serde_json::json;

/// Name of the project all seeded builds belong to.
pub const SAMPLE_PROJECT: &str = "SampleProject";

/// Stable GUID of [`SAMPLE_PROJECT`].
pub const SAMPLE_PROJECT_ID: &str = "c4f9a3b1-93e3-4f96-a14e-88db3dd9cf0f";

/// Publisher half of the self-heal fixture key.
pub const SELF_HEAL_PUBLISHER: &str = "fixture-publisher";

/// Extension-id half of the self-heal fixture key.
pub const SELF_HEAL_EXTENSION_ID: &str = "self-heal-extension";

/// The fixed entity census the store is (re-)seeded from.
#[derive(Debug)]
pub struct SeedData {
    /// Seeded build definitions.
    pub definitions: Vec<BuildDefinition>,
    /// Seeded builds; ids below the store's first allocated id.
    pub builds: Vec<Build>,
    /// Seeded task definitions.
    pub tasks: Vec<TaskDefinition>,
    /// Seeded work items.
    pub work_items: Vec<WorkItem>,
    /// Seeded extensions, self-heal fixture included.
    pub extensions: Vec<Extension>,
}

impl SeedData {
    /// Build the census, deriving entity URLs from `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            definitions: definitions(),
            builds: builds(base),
            tasks: tasks(),
            work_items: work_items(base),
            extensions: extensions(),
        }
    }
}

/// The self-heal fixture extension in its seeded form.
///
/// The extension handler re-creates exactly this entity after the fixture
/// is deleted, so concurrently running validation suites keep finding it.
#[must_use]
pub fn self_heal_extension() -> Extension {
    let now = Utc::now();
    Extension {
        extension_id: SELF_HEAL_EXTENSION_ID.to_string(),
        extension_name: SELF_HEAL_EXTENSION_ID.to_string(),
        display_name: "Self Heal Fixture".to_string(),
        short_description: "Fixture extension relied on by validation suites".to_string(),
        publisher: Publisher {
            publisher_name: SELF_HEAL_PUBLISHER.to_string(),
            display_name: "Fixture Publisher".to_string(),
        },
        categories: vec!["Azure Pipelines".to_string()],
        flags: "validated".to_string(),
        versions: vec![
            ExtensionVersion {
                version: "1.1.0".to_string(),
                flags: "validated".to_string(),
                last_updated: now,
            },
            ExtensionVersion {
                version: "1.0.0".to_string(),
                flags: "validated".to_string(),
                last_updated: now - Duration::days(30),
            },
        ],
        last_updated: now,
    }
}

fn sample_project() -> ProjectRef {
    ProjectRef {
        id: SAMPLE_PROJECT_ID.to_string(),
        name: SAMPLE_PROJECT.to_string(),
    }
}

fn definitions() -> Vec<BuildDefinition> {
    vec![
        BuildDefinition {
            id: 1,
            name: "Sample Build Definition".to_string(),
            project: SAMPLE_PROJECT.to_string(),
            revision: 3,
            repository: RepositoryRef {
                id: "2f3d611a-f012-4b39-b157-8db63f7e2abc".to_string(),
                name: "sample-repo".to_string(),
                repo_type: "TfsGit".to_string(),
            },
            process: None,
        },
        BuildDefinition {
            id: 2,
            name: "Nightly Packaging".to_string(),
            project: SAMPLE_PROJECT.to_string(),
            revision: 1,
            repository: RepositoryRef {
                id: "8a4e21c7-09df-4f6b-9f83-1be21c0d9aef".to_string(),
                name: "packaging".to_string(),
                repo_type: "TfsGit".to_string(),
            },
            process: Some(BuildProcess {
                phases: vec![BuildPhase {
                    name: "Package".to_string(),
                    steps: Some(json!([
                        { "displayName": "Restore" },
                        { "displayName": "Pack" }
                    ])),
                }],
            }),
        },
    ]
}

fn builds(base: &str) -> Vec<Build> {
    let now = Utc::now();
    vec![
        Build {
            id: 1,
            build_number: "Sample Build Definition_1700000000001".to_string(),
            status: BuildStatus::Completed,
            result: BuildResult::Succeeded,
            queue_time: now - Duration::hours(2),
            start_time: Some(now - Duration::hours(2)),
            finish_time: Some(now - Duration::hours(1)),
            definition: DefinitionRef {
                id: 1,
                name: "Sample Build Definition".to_string(),
            },
            project: sample_project(),
            url: format!("{base}/_apis/build/builds/1"),
        },
        Build {
            id: 2,
            build_number: "Sample Build Definition_1700000000002".to_string(),
            status: BuildStatus::InProgress,
            result: BuildResult::None,
            queue_time: now - Duration::minutes(10),
            start_time: Some(now - Duration::minutes(9)),
            finish_time: None,
            definition: DefinitionRef {
                id: 1,
                name: "Sample Build Definition".to_string(),
            },
            project: sample_project(),
            url: format!("{base}/_apis/build/builds/2"),
        },
    ]
}

fn tasks() -> Vec<TaskDefinition> {
    vec![
        TaskDefinition {
            id: "d9bafed4-0b18-4f58-968d-86655b4d2ce9".to_string(),
            name: "CmdLine".to_string(),
            friendly_name: "Command Line".to_string(),
            description: Some("Run a command line script".to_string()),
            category: Some("Utility".to_string()),
            version: TaskVersion::new(2, 212, 0),
            inputs: Some(json!([
                { "name": "script", "type": "multiLine", "required": true }
            ])),
            execution: json!({ "Node10": { "target": "cmdline.js" } }),
        },
        TaskDefinition {
            id: "e213ff0f-5d5c-4791-802d-52ea3e7be1f1".to_string(),
            name: "PowerShell".to_string(),
            friendly_name: "PowerShell".to_string(),
            description: Some("Run a PowerShell script".to_string()),
            category: Some("Utility".to_string()),
            version: TaskVersion::new(2, 210, 1),
            inputs: Some(json!([
                { "name": "targetType", "type": "radio", "required": false }
            ])),
            execution: json!({ "PowerShell3": { "target": "powershell.ps1" } }),
        },
    ]
}

fn work_items(base: &str) -> Vec<WorkItem> {
    let now = Utc::now().to_rfc3339();
    let fields = |item_type: &str, title: &str, state: &str| {
        let mut map = serde_json::Map::new();
        map.insert("System.WorkItemType".to_string(), json!(item_type));
        map.insert("System.Title".to_string(), json!(title));
        map.insert("System.State".to_string(), json!(state));
        map.insert("System.CreatedDate".to_string(), json!(now.clone()));
        map.insert("System.ChangedDate".to_string(), json!(now.clone()));
        map
    };
    vec![
        WorkItem {
            id: 1,
            rev: 1,
            fields: fields("Bug", "Sample bug", "New"),
            url: format!("{base}/_apis/wit/workItems/1"),
        },
        WorkItem {
            id: 2,
            rev: 2,
            fields: fields("Task", "Sample task", "Active"),
            url: format!("{base}/_apis/wit/workItems/2"),
        },
    ]
}

fn extensions() -> Vec<Extension> {
    let now = Utc::now();
    vec![
        self_heal_extension(),
        Extension {
            extension_id: "build-timer".to_string(),
            extension_name: "build-timer".to_string(),
            display_name: "Build Timer".to_string(),
            short_description: "Adds timing summaries to build results".to_string(),
            publisher: Publisher {
                publisher_name: "acme".to_string(),
                display_name: "Acme Tools".to_string(),
            },
            categories: vec!["Azure Pipelines".to_string()],
            flags: "validated".to_string(),
            versions: vec![ExtensionVersion {
                version: "2.0.1".to_string(),
                flags: "validated".to_string(),
                last_updated: now,
            }],
            last_updated: now,
        },
        Extension {
            extension_id: "release-notes".to_string(),
            extension_name: "release-notes".to_string(),
            display_name: "Release Notes Generator".to_string(),
            short_description: "Generates release notes from work items".to_string(),
            publisher: Publisher {
                publisher_name: "contoso".to_string(),
                display_name: "Contoso".to_string(),
            },
            categories: vec!["Azure Repos".to_string(), "Azure Boards".to_string()],
            flags: "none".to_string(),
            versions: vec![ExtensionVersion {
                version: "0.9.0".to_string(),
                flags: "none".to_string(),
                last_updated: now,
            }],
            last_updated: now,
        },
    ]
}
