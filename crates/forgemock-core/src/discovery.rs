//! Service-discovery protocol tables.
//!
//! Clients resolve which base URL serves a given API area in two steps:
//! enumerate the area descriptors (`GET /_apis/resourceareas`), then look
//! one up by GUID. Functional calls go against the resolved URL, and
//! `OPTIONS /_apis/{area}` advertises the concrete endpoints of an area as
//! resource descriptors.
//!
//! Everything here is a fixed table. The GUIDs are declared once as
//! constants and never derived at runtime; clients hard-code them, so they
//! are part of the wire contract. Area names used as table keys are
//! case-sensitive: `ExtensionManagement` and `extensionmanagement` are
//! distinct tables with distinct contents.

use std::collections::HashMap;

use serde::Serialize;
use uuid::{uuid, Uuid};

/// Well-known area GUIDs, in enumeration order.
pub mod area_ids {
    use uuid::{uuid, Uuid};

    /// Location area.
    pub const LOCATION: Uuid = uuid!("e81700f7-3be2-46de-8624-2eb35882fcaa");
    /// Build area, legacy id kept for older client code paths.
    pub const BUILD_LEGACY: Uuid = uuid!("965220d5-5bb9-42cf-8d67-9b146df2a5a4");
    /// Build area, current id.
    pub const BUILD: Uuid = uuid!("5d6898bb-45ec-463f-95f9-54d49c71752e");
    /// DistributedTask area.
    pub const DISTRIBUTED_TASK: Uuid = uuid!("a85b8835-c1a1-4aac-ae97-1c3d0ba72dbd");
    /// Gallery area.
    pub const GALLERY: Uuid = uuid!("69d21c00-f135-441b-b5ce-3626378e0819");
    /// ExtensionManagement area.
    pub const EXTENSION_MANAGEMENT: Uuid = uuid!("6c2b0933-3600-42ae-bf8b-93d4f7e83594");
    /// Work-item-tracking area.
    pub const WIT: Uuid = uuid!("5264459e-e5e0-4bd8-b118-0985e68a4ec5");
}

/// Well-known resource GUIDs.
pub mod resource_ids {
    use uuid::{uuid, Uuid};

    /// Location: resource-area enumeration.
    pub const RESOURCE_AREAS: Uuid = uuid!("e44f25ac-33b7-41a4-9b4c-105d21fb7f7d");
    /// Location: connection data probe.
    pub const CONNECTION_DATA: Uuid = uuid!("00d9565f-ed9c-4a06-9a50-00e7896ccab4");
    /// Build: builds collection.
    pub const BUILDS: Uuid = uuid!("0cd358e1-9217-4d94-8269-1c1ee6f93dcf");
    /// Build: definitions collection.
    pub const DEFINITIONS: Uuid = uuid!("dbeaf647-6167-421a-bda9-c9327b25e2e6");
    /// DistributedTask: task definitions collection.
    pub const TASKS: Uuid = uuid!("60aac929-f0cd-4bc8-9ce4-6b30e8f1b1bd");
    /// Gallery: extension search.
    pub const EXTENSIONS: Uuid = uuid!("eb9d5ee1-6d43-456b-b80e-8a96fbc014b6");
    /// Gallery: publisher-scoped extension access.
    pub const PUBLISHER_EXTENSIONS: Uuid = uuid!("e11ea35a-16fe-4b80-ab11-c4cab88a0966");
    /// ExtensionManagement: installed extensions collection.
    pub const INSTALLED_EXTENSIONS: Uuid = uuid!("275424d0-c844-4fe2-bda6-04933a1357d8");
    /// ExtensionManagement: install-by-name.
    pub const INSTALLED_BY_NAME: Uuid = uuid!("fb0da285-f23e-4b56-8b53-3ef5f9f6de66");
    /// wit: work items collection.
    pub const WORK_ITEMS: Uuid = uuid!("72c7ddf8-2cdc-4f60-90cd-ab71c14a399b");
    /// wit: query endpoint.
    pub const WIQL: Uuid = uuid!("a02355f5-5f8a-4671-8e32-369d23aac83d");
}

/// Deployment identity returned by the connection-data probe.
pub const INSTANCE_ID: Uuid = uuid!("8d299418-9467-402b-a171-9165e2f703e2");

/// Deployment id returned by the connection-data probe.
pub const DEPLOYMENT_ID: Uuid = uuid!("f1b0a9c2-74de-4bc9-8b6e-71a589f2c9d4");

/// Identity of the one mock user every credentialed request resolves to.
pub const MOCK_USER_ID: Uuid = uuid!("3b5f8a0d-52c4-4f5e-9d7b-6f0e2ad14c83");

/// The fixed connection/identity probe envelope.
#[must_use]
pub fn connection_data() -> serde_json::Value {
    let user = serde_json::json!({
        "id": MOCK_USER_ID,
        "providerDisplayName": "Forgemock User",
        "customDisplayName": "Forgemock User",
        "isActive": true,
    });
    serde_json::json!({
        "authenticatedUser": user,
        "authorizedUser": user,
        "instanceId": INSTANCE_ID,
        "deploymentId": DEPLOYMENT_ID,
        "deploymentType": "hosted",
    })
}

/// A full area descriptor as enumerated by `GET /_apis/resourceareas`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaDescriptor {
    /// Stable area GUID.
    pub id: Uuid,
    /// Area name, e.g. `"build"`.
    pub name: String,
    /// Base URL that serves this area.
    pub location_url: String,
    /// Route template for the area root.
    pub route_template: String,
    /// Area resource version.
    pub resource_version: i32,
}

/// The minimal projection of an area, for lookups that only confirm
/// existence.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSummary {
    /// Stable area GUID.
    pub id: Uuid,
    /// Area name.
    pub name: String,
    /// Base URL that serves this area.
    pub location_url: String,
}

/// One concrete endpoint within an area, advertised by
/// `OPTIONS /_apis/{area}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// Stable resource GUID.
    pub id: Uuid,
    /// Owning area name.
    pub area: String,
    /// Resource name, e.g. `"Builds"`.
    pub resource_name: String,
    /// Route template with `{placeholder}` segments.
    pub route_template: String,
    /// Resource version.
    pub resource_version: i32,
    /// Lowest supported api-version.
    pub min_version: String,
    /// Highest supported api-version.
    pub max_version: String,
    /// Released api-version.
    pub released_version: String,
}

/// Which projection a by-GUID lookup returns for an area.
///
/// A declared per-entry policy, not a uniform rule: some areas need full
/// routing detail, others only existence confirmation. Clients depend on
/// which is which.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaProjection {
    /// Return the full [`AreaDescriptor`].
    Full,
    /// Return the [`AreaSummary`] projection.
    Minimal,
}

/// Result of a by-GUID area lookup.
#[derive(Debug, Clone)]
pub enum AreaLookup {
    /// The full descriptor.
    Full(AreaDescriptor),
    /// The minimal projection.
    Minimal(AreaSummary),
}

impl AreaLookup {
    /// Serialize the selected projection.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::Full(descriptor) => {
                serde_json::to_value(descriptor).unwrap_or(serde_json::Value::Null)
            }
            Self::Minimal(summary) => {
                serde_json::to_value(summary).unwrap_or(serde_json::Value::Null)
            }
        }
    }
}

/// The canned discovery tables, built once per server from its public base
/// URL.
#[derive(Debug)]
pub struct DiscoveryTables {
    areas: Vec<(AreaDescriptor, AreaProjection)>,
    resources: HashMap<&'static str, Vec<ResourceDescriptor>>,
}

impl DiscoveryTables {
    /// Build the tables for a server reachable at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let location_url = normalize_base_url(base_url);

        let area = |id: Uuid, name: &str, template: &str, version: i32| AreaDescriptor {
            id,
            name: name.to_string(),
            location_url: location_url.clone(),
            route_template: template.to_string(),
            resource_version: version,
        };

        // Enumeration order is part of the contract; keep it stable.
        let areas = vec![
            (
                area(area_ids::LOCATION, "Location", "/_apis/{resource}", 2),
                AreaProjection::Minimal,
            ),
            (
                area(
                    area_ids::BUILD_LEGACY,
                    "build",
                    "/{project}/_apis/build/{resource}",
                    1,
                ),
                AreaProjection::Full,
            ),
            (
                area(
                    area_ids::BUILD,
                    "build",
                    "/{project}/_apis/build/{resource}",
                    2,
                ),
                AreaProjection::Full,
            ),
            (
                area(
                    area_ids::DISTRIBUTED_TASK,
                    "DistributedTask",
                    "/_apis/distributedtask/{resource}",
                    1,
                ),
                AreaProjection::Full,
            ),
            (
                area(
                    area_ids::GALLERY,
                    "Gallery",
                    "/_apis/gallery/{resource}",
                    1,
                ),
                AreaProjection::Minimal,
            ),
            (
                area(
                    area_ids::EXTENSION_MANAGEMENT,
                    "ExtensionManagement",
                    "/_apis/extensionmanagement/{resource}",
                    1,
                ),
                AreaProjection::Minimal,
            ),
            (
                area(area_ids::WIT, "wit", "/_apis/wit/{resource}", 2),
                AreaProjection::Minimal,
            ),
        ];

        Self {
            areas,
            resources: resource_tables(),
        }
    }

    /// The fixed, ordered area descriptor set.
    #[must_use]
    pub fn areas(&self) -> Vec<&AreaDescriptor> {
        self.areas.iter().map(|(descriptor, _)| descriptor).collect()
    }

    /// Look an area up by GUID, applying its declared projection policy.
    #[must_use]
    pub fn area_by_id(&self, id: Uuid) -> Option<AreaLookup> {
        self.areas
            .iter()
            .find(|(descriptor, _)| descriptor.id == id)
            .map(|(descriptor, projection)| match projection {
                AreaProjection::Full => AreaLookup::Full(descriptor.clone()),
                AreaProjection::Minimal => AreaLookup::Minimal(AreaSummary {
                    id: descriptor.id,
                    name: descriptor.name.clone(),
                    location_url: descriptor.location_url.clone(),
                }),
            })
    }

    /// The resource table for an area name, if one is known.
    ///
    /// Keys are case-sensitive.
    #[must_use]
    pub fn resources_for(&self, area: &str) -> Option<&[ResourceDescriptor]> {
        self.resources.get(area).map(Vec::as_slice)
    }
}

fn normalize_base_url(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    }
}

fn resource_tables() -> HashMap<&'static str, Vec<ResourceDescriptor>> {
    let resource = |id: Uuid, area: &str, name: &str, template: &str| ResourceDescriptor {
        id,
        area: area.to_string(),
        resource_name: name.to_string(),
        route_template: template.to_string(),
        resource_version: 1,
        min_version: "1.0".to_string(),
        max_version: "7.1".to_string(),
        released_version: "7.1".to_string(),
    };

    let mut tables: HashMap<&'static str, Vec<ResourceDescriptor>> = HashMap::new();

    tables.insert(
        "Location",
        vec![
            resource(
                resource_ids::RESOURCE_AREAS,
                "Location",
                "ResourceAreas",
                "/_apis/resourceAreas/{areaId}",
            ),
            resource(
                resource_ids::CONNECTION_DATA,
                "Location",
                "ConnectionData",
                "/_apis/connectionData",
            ),
        ],
    );

    tables.insert(
        "build",
        vec![
            resource(
                resource_ids::BUILDS,
                "build",
                "Builds",
                "/{project}/_apis/build/builds/{buildId}",
            ),
            resource(
                resource_ids::DEFINITIONS,
                "build",
                "Definitions",
                "/{project}/_apis/build/definitions/{definitionId}",
            ),
        ],
    );

    tables.insert(
        "distributedtask",
        vec![resource(
            resource_ids::TASKS,
            "distributedtask",
            "Tasks",
            "/_apis/distributedtask/tasks/{taskId}",
        )],
    );

    tables.insert(
        "gallery",
        vec![
            resource(
                resource_ids::EXTENSIONS,
                "gallery",
                "Extensions",
                "/_apis/gallery/extensions",
            ),
            resource(
                resource_ids::PUBLISHER_EXTENSIONS,
                "gallery",
                "PublisherExtensions",
                "/_apis/gallery/publishers/{publisherName}/extensions/{extensionName}",
            ),
        ],
    );

    // Two distinct tables on purpose: the cased key advertises the
    // management surface, the lowercase key the install-by-name surface
    // older clients probe for.
    tables.insert(
        "ExtensionManagement",
        vec![resource(
            resource_ids::INSTALLED_EXTENSIONS,
            "ExtensionManagement",
            "InstalledExtensions",
            "/_apis/extensionmanagement/installedextensions",
        )],
    );
    tables.insert(
        "extensionmanagement",
        vec![resource(
            resource_ids::INSTALLED_BY_NAME,
            "extensionmanagement",
            "InstalledExtensionsByName",
            "/_apis/extensionmanagement/installedextensionsbyname/{publisherName}/{extensionName}",
        )],
    );

    tables.insert(
        "wit",
        vec![
            resource(
                resource_ids::WORK_ITEMS,
                "wit",
                "WorkItems",
                "/_apis/wit/workItems/{id}",
            ),
            resource(resource_ids::WIQL, "wit", "Wiql", "/_apis/wit/wiql"),
        ],
    );

    tables
}
