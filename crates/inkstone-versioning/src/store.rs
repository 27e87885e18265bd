//! Version store: one persisted stream of snapshots per document.

use crate::diff::{compute_diff, Diff};
use crate::settings::VersionSettings;
use crate::version::{EntityKind, Version, VersionHistory, VersionStats};
use inkstone_storage::Storage;
use tracing::{debug, info, warn};

/// First storage-key segment for all version streams.
const VERSIONS_PREFIX: &str = "versions";

/// Persisted version history for a single document.
///
/// The history is loaded once at open and held in memory; every mutation
/// persists the whole stream back to storage. A failed write keeps the
/// in-memory state and logs a warning, leaving a transient divergence until
/// the next successful write. No operation here returns an error: absence is
/// `None` and storage failures are logged sentinels.
pub struct VersionStore<S: Storage> {
    storage: S,
    history: VersionHistory,
    settings: VersionSettings,
}

impl<S: Storage> VersionStore<S> {
    /// Open the version stream for a document.
    ///
    /// A missing, unreadable, or malformed stream starts empty; the failure
    /// is logged and never surfaced.
    pub async fn open(
        storage: S,
        entity_id: impl Into<String>,
        entity_kind: EntityKind,
        settings: VersionSettings,
    ) -> Self {
        let entity_id = entity_id.into();
        let key = [VERSIONS_PREFIX, entity_kind.as_str(), entity_id.as_str()];

        let history = match storage.read::<VersionHistory>(&key).await {
            Ok(Some(history)) => history,
            Ok(None) => VersionHistory::new(entity_id.clone(), entity_kind),
            Err(e) => {
                warn!(
                    entity_id = %entity_id,
                    entity_kind = %entity_kind,
                    error = %e,
                    "Failed to load version history, starting empty"
                );
                VersionHistory::new(entity_id.clone(), entity_kind)
            }
        };

        Self {
            storage,
            history,
            settings,
        }
    }

    /// The in-memory history for this stream.
    pub fn history(&self) -> &VersionHistory {
        &self.history
    }

    /// The settings this store was opened with.
    pub fn settings(&self) -> &VersionSettings {
        &self.settings
    }

    /// Replace the settings, persisting them to the shared settings key.
    pub async fn update_settings(&mut self, settings: VersionSettings) {
        settings.save(&self.storage).await;
        self.settings = settings;
    }

    /// Commit the current content as a new version.
    ///
    /// Returns `None` without touching the stream when:
    /// - the content is identical to the last version's content, or
    /// - there is no message and no tags and the character-count length
    ///   delta is below `min_change_size` (automatic-commit suppression;
    ///   manual saves carry a message and bypass this).
    ///
    /// On success the new version becomes current and retention is enforced:
    /// tagged versions are never pruned, the oldest untagged versions are
    /// removed until the stream fits `max_versions` again.
    pub async fn create_version(
        &mut self,
        content: &str,
        message: Option<String>,
        tags: Vec<String>,
    ) -> Option<Version> {
        let previous = self
            .history
            .versions
            .last()
            .map(|v| v.content.clone())
            .unwrap_or_default();

        if previous == content {
            return None;
        }

        let diff = compute_diff(&previous, content);

        let change_size = length_delta(&previous, content);
        if change_size < self.settings.min_change_size && message.is_none() && tags.is_empty() {
            debug!(
                entity_id = %self.history.entity_id,
                change_size,
                min_change_size = self.settings.min_change_size,
                "Change below threshold, not creating version"
            );
            return None;
        }

        let mut version = Version::new(
            self.history.entity_id.clone(),
            self.history.entity_kind,
            content,
        );
        version.message = message;
        version.tags = tags;
        version.diff = Some(diff);

        self.history.versions.push(version.clone());
        self.enforce_retention();
        self.history.current_version_id = Some(version.id.clone());

        info!(
            entity_id = %self.history.entity_id,
            version_id = %version.id,
            versions = self.history.versions.len(),
            "Created version"
        );

        self.persist().await;
        Some(version)
    }

    /// Return the stored content of a version, or `None` if the id is
    /// unknown.
    ///
    /// Restoring never truncates history: newer versions stay in place and
    /// the caller is expected to commit the restored text as a new head via
    /// [`create_version`](Self::create_version).
    pub fn restore_version(&self, version_id: &str) -> Option<String> {
        self.history.find(version_id).map(|v| v.content.clone())
    }

    /// Diff the stored contents of two versions, or `None` if either id is
    /// unknown.
    pub fn compare_versions(&self, version_id1: &str, version_id2: &str) -> Option<Diff> {
        let version1 = self.history.find(version_id1)?;
        let version2 = self.history.find(version_id2)?;
        Some(compute_diff(&version1.content, &version2.content))
    }

    /// Add a tag to a version. Adding an existing tag is a no-op; an unknown
    /// id is ignored.
    pub async fn add_tag(&mut self, version_id: &str, tag: &str) {
        let Some(version) = self
            .history
            .versions
            .iter_mut()
            .find(|v| v.id == version_id)
        else {
            return;
        };

        if !version.tags.iter().any(|t| t == tag) {
            version.tags.push(tag.to_string());
        }
        self.persist().await;
    }

    /// Remove a tag from a version. Removing an absent tag is a no-op; an
    /// unknown id is ignored.
    pub async fn remove_tag(&mut self, version_id: &str, tag: &str) {
        let Some(version) = self
            .history
            .versions
            .iter_mut()
            .find(|v| v.id == version_id)
        else {
            return;
        };

        version.tags.retain(|t| t != tag);
        self.persist().await;
    }

    /// Remove a version unconditionally, including the current head.
    ///
    /// The current pointer is left untouched and may dangle afterwards.
    pub async fn delete_version(&mut self, version_id: &str) {
        self.history.versions.retain(|v| v.id != version_id);
        self.persist().await;
    }

    /// Summary statistics over the stream.
    pub fn stats(&self) -> VersionStats {
        let versions = &self.history.versions;
        VersionStats {
            total_versions: versions.len(),
            tagged_versions: versions.iter().filter(|v| v.is_tagged()).count(),
            total_changes: versions
                .iter()
                .filter_map(|v| v.diff.as_ref())
                .map(|d| d.additions + d.deletions)
                .sum(),
            oldest_version: versions.first().map(|v| v.created_at),
            newest_version: versions.last().map(|v| v.created_at),
        }
    }

    /// Prune the oldest untagged versions once the stream exceeds
    /// `max_versions`. Tagged versions always survive, even when that keeps
    /// the stream above the ceiling. The result is re-sorted by creation
    /// time ascending.
    fn enforce_retention(&mut self) {
        if self.history.versions.len() <= self.settings.max_versions {
            return;
        }

        let (tagged, mut untagged): (Vec<Version>, Vec<Version>) = self
            .history
            .versions
            .drain(..)
            .partition(|v| v.is_tagged());

        let keep = self.settings.max_versions.saturating_sub(tagged.len());
        if untagged.len() > keep {
            let excess = untagged.len() - keep;
            debug!(
                entity_id = %self.history.entity_id,
                pruned = excess,
                "Pruning old untagged versions"
            );
            untagged.drain(..excess);
        }

        let mut versions = tagged;
        versions.extend(untagged);
        versions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        self.history.versions = versions;
    }

    /// Persist the in-memory history. Failures are logged and the in-memory
    /// state is kept; there is no retry.
    async fn persist(&self) {
        let key = [
            VERSIONS_PREFIX,
            self.history.entity_kind.as_str(),
            self.history.entity_id.as_str(),
        ];

        if let Err(e) = self.storage.write(&key, &self.history).await {
            warn!(
                entity_id = %self.history.entity_id,
                error = %e,
                "Failed to save version history, in-memory state kept"
            );
        }
    }
}

/// Character-count length delta between two texts.
fn length_delta(old: &str, new: &str) -> usize {
    old.chars().count().abs_diff(new.chars().count())
}
