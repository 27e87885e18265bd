//! Version-control settings.
//!
//! Settings are process-wide and shared by every version stream. They are
//! persisted under a single storage key so the editor, the history panel,
//! and the auto-versioning timer all see the same values.

use inkstone_storage::Storage;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Storage key for the shared settings record.
pub const SETTINGS_KEY: [&str; 2] = ["settings", "versioning"];

/// Process-wide version-control settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VersionSettings {
    /// Whether the auto-versioning timer commits at all.
    pub auto_save: bool,

    /// Debounce interval for automatic commits, in minutes.
    pub auto_save_interval: u64,

    /// Retention ceiling per stream. Tagged versions are exempt.
    pub max_versions: usize,

    /// Declared placeholder carried in the stored settings record; nothing
    /// reads it yet.
    pub compress_old_versions: bool,

    /// Minimum character-count length delta required for an automatic
    /// commit. Manual saves (any message or tag) bypass this.
    pub min_change_size: usize,
}

impl Default for VersionSettings {
    fn default() -> Self {
        Self {
            auto_save: true,
            auto_save_interval: 10,
            max_versions: 50,
            compress_old_versions: false,
            min_change_size: 100,
        }
    }
}

impl VersionSettings {
    /// Load settings from storage, falling back to defaults.
    ///
    /// A missing or malformed record is never an error: the defaults are
    /// used and the failure is logged.
    pub async fn load<S: Storage>(storage: &S) -> Self {
        match storage.read::<Self>(&SETTINGS_KEY).await {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!(error = %e, "Failed to load version settings, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings to storage. Write failures are logged, not surfaced.
    pub async fn save<S: Storage>(&self, storage: &S) {
        if let Err(e) = storage.write(&SETTINGS_KEY, self).await {
            warn!(error = %e, "Failed to save version settings");
        }
    }

    /// The auto-save debounce interval as a [`Duration`].
    pub fn auto_save_delay(&self) -> Duration {
        Duration::from_secs(self.auto_save_interval * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkstone_storage::MemoryStorage;

    #[test]
    fn defaults_match_app_defaults() {
        let settings = VersionSettings::default();
        assert!(settings.auto_save);
        assert_eq!(settings.auto_save_interval, 10);
        assert_eq!(settings.max_versions, 50);
        assert_eq!(settings.min_change_size, 100);
        assert!(!settings.compress_old_versions);
    }

    #[test]
    fn delay_converts_minutes() {
        let settings = VersionSettings {
            auto_save_interval: 3,
            ..Default::default()
        };
        assert_eq!(settings.auto_save_delay(), Duration::from_secs(180));
    }

    #[tokio::test]
    async fn load_missing_returns_defaults() {
        let storage = MemoryStorage::new();
        let settings = VersionSettings::load(&storage).await;
        assert_eq!(settings, VersionSettings::default());
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let storage = MemoryStorage::new();
        let settings = VersionSettings {
            auto_save: false,
            auto_save_interval: 5,
            max_versions: 10,
            compress_old_versions: false,
            min_change_size: 20,
        };

        settings.save(&storage).await;
        let loaded = VersionSettings::load(&storage).await;
        assert_eq!(loaded, settings);
    }

    #[tokio::test]
    async fn load_malformed_returns_defaults() {
        let storage = MemoryStorage::new();
        // A record with the wrong shape at the settings key
        storage.write(&SETTINGS_KEY, &vec![1, 2, 3]).await.unwrap();

        let settings = VersionSettings::load(&storage).await;
        assert_eq!(settings, VersionSettings::default());
    }
}
