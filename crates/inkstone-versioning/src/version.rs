//! Version data structures.

use crate::diff::Diff;
use chrono::{DateTime, Utc};
use inkstone_util::{IdPrefix, Identifier};
use serde::{Deserialize, Serialize};

/// The kind of document a version stream belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Chapter,
    Plot,
    Character,
    WorldSetting,
}

impl EntityKind {
    /// Get the storage-key segment for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Chapter => "chapter",
            EntityKind::Plot => "plot",
            EntityKind::Character => "character",
            EntityKind::WorldSetting => "worldSetting",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable full-content snapshot of one document at a point in time.
///
/// `content` is authoritative: restore always returns it verbatim. `diff` is
/// a precomputed delta against the immediately preceding version, kept for
/// display only. After creation a version is only ever mutated through its
/// `tags` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    /// Unique identifier (`ver_` prefixed ULID).
    pub id: String,

    /// ID of the owning document.
    pub entity_id: String,

    /// Kind of the owning document.
    #[serde(rename = "entityType")]
    pub entity_kind: EntityKind,

    /// Full text snapshot at commit time.
    pub content: String,

    /// When the version was committed.
    pub created_at: DateTime<Utc>,

    /// Optional human-supplied label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Pinning markers. A tagged version is exempt from retention pruning.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Who committed the version, when the app tracks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Display-only delta against the previous version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<Diff>,
}

impl Version {
    /// Create a new version with a fresh id and the current time.
    pub fn new(
        entity_id: impl Into<String>,
        entity_kind: EntityKind,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Identifier::ascending(IdPrefix::Version),
            entity_id: entity_id.into(),
            entity_kind,
            content: content.into(),
            created_at: Utc::now(),
            message: None,
            tags: Vec::new(),
            author: None,
            diff: None,
        }
    }

    /// Whether this version carries any tags.
    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }
}

/// The ordered sequence of all versions for one (entity, kind) pair.
///
/// Versions are ordered by `created_at` ascending and never reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionHistory {
    /// ID of the owning document.
    pub entity_id: String,

    /// Kind of the owning document.
    #[serde(rename = "entityType")]
    pub entity_kind: EntityKind,

    /// Versions, oldest first.
    pub versions: Vec<Version>,

    /// The most recently committed or restored version, if any.
    ///
    /// May dangle after `delete_version`; callers that follow the pointer
    /// must handle a missing id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version_id: Option<String>,
}

impl VersionHistory {
    /// Create an empty history for a document.
    pub fn new(entity_id: impl Into<String>, entity_kind: EntityKind) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_kind,
            versions: Vec::new(),
            current_version_id: None,
        }
    }

    /// Look up a version by id.
    pub fn find(&self, version_id: &str) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == version_id)
    }
}

/// Summary statistics over one version stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionStats {
    /// Total number of stored versions.
    pub total_versions: usize,

    /// Number of tagged (pinned) versions.
    pub tagged_versions: usize,

    /// Sum of added and deleted lines across all stored diffs.
    pub total_changes: usize,

    /// Timestamp of the oldest stored version.
    pub oldest_version: Option<DateTime<Utc>>,

    /// Timestamp of the newest stored version.
    pub newest_version: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_storage_segments() {
        assert_eq!(EntityKind::Chapter.as_str(), "chapter");
        assert_eq!(EntityKind::Plot.as_str(), "plot");
        assert_eq!(EntityKind::Character.as_str(), "character");
        assert_eq!(EntityKind::WorldSetting.as_str(), "worldSetting");
    }

    #[test]
    fn version_ids_are_prefixed() {
        let version = Version::new("chp_1", EntityKind::Chapter, "content");
        assert!(version.id.starts_with("ver_"));
        assert!(!version.is_tagged());
    }

    #[test]
    fn version_serializes_with_camel_case_keys() {
        let version = Version::new("chp_1", EntityKind::Chapter, "content");
        let json = serde_json::to_value(&version).unwrap();

        assert_eq!(json["entityId"], "chp_1");
        assert_eq!(json["entityType"], "chapter");
        assert!(json.get("createdAt").is_some());
        // Empty optional fields are omitted from the stored record
        assert!(json.get("message").is_none());
        assert!(json.get("tags").is_none());
    }

    #[test]
    fn history_find_by_id() {
        let mut history = VersionHistory::new("chp_1", EntityKind::Chapter);
        let version = Version::new("chp_1", EntityKind::Chapter, "content");
        let id = version.id.clone();
        history.versions.push(version);

        assert!(history.find(&id).is_some());
        assert!(history.find("ver_missing").is_none());
    }
}
