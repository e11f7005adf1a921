//! Gallery extension entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The publisher of an extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    /// Machine name, half of the `(publisherName, extensionId)` key.
    pub publisher_name: String,
    /// Display name.
    pub display_name: String,
}

/// One entry of an extension's version history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionVersion {
    /// Version string, e.g. `"1.2.0"`.
    pub version: String,
    /// Per-version flags, e.g. `"validated"`.
    pub flags: String,
    /// When this version was published.
    pub last_updated: DateTime<Utc>,
}

/// A gallery extension.
///
/// Keyed by `(publisher.publisher_name, extension_id)`. `versions` is
/// ordered newest first; publishing a version that already exists must not
/// duplicate it, and unknown versions are prepended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    /// Extension id, half of the key.
    pub extension_id: String,
    /// Machine name.
    pub extension_name: String,
    /// Display name.
    pub display_name: String,
    /// One-line description.
    pub short_description: String,
    /// Owning publisher.
    pub publisher: Publisher,
    /// Gallery categories.
    pub categories: Vec<String>,
    /// Extension-level flags summarizing validation state.
    pub flags: String,
    /// Version history, newest first.
    pub versions: Vec<ExtensionVersion>,
    /// Timestamp of the most recent change.
    pub last_updated: DateTime<Utc>,
}

impl Extension {
    /// Whether this extension matches a `(publisher, id)` key.
    #[must_use]
    pub fn has_key(&self, publisher_name: &str, extension_id: &str) -> bool {
        self.publisher.publisher_name == publisher_name && self.extension_id == extension_id
    }

    /// Merge one version into the history.
    ///
    /// Known versions are left in place; unknown versions are prepended so
    /// the newest-first ordering holds.
    pub fn merge_version(&mut self, version: ExtensionVersion) {
        if self.versions.iter().any(|v| v.version == version.version) {
            return;
        }
        self.last_updated = version.last_updated;
        self.versions.insert(0, version);
    }
}
