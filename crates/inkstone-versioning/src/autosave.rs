//! Timer-driven automatic versioning.
//!
//! Wraps a [`VersionStore`] with a debounce: every content change pushes the
//! commit deadline out by the configured interval, so a version is only
//! committed once the writer has been quiet for that long. Manual saves
//! commit immediately and re-arm the timer.

use crate::settings::VersionSettings;
use crate::store::VersionStore;
use crate::version::Version;
use inkstone_storage::Storage;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

/// Label on versions committed by the timer.
pub const AUTO_SAVE_MESSAGE: &str = "auto-save";

/// Label on the best-effort version committed at teardown.
pub const SESSION_END_MESSAGE: &str = "auto-save (session end)";

/// Editing state shared with the pending timer task.
struct EditState {
    /// The document text as of the latest change.
    content: String,
    /// The text as of the last committed version.
    last_saved: String,
}

/// Debounced auto-versioning for one document under edit.
///
/// The policy applies its own length-delta threshold before committing and
/// then calls [`VersionStore::create_version`] with a message, which
/// bypasses the store-level threshold. Both checks use the same
/// `min_change_size` setting.
pub struct AutoVersioner<S: Storage + 'static> {
    store: Arc<Mutex<VersionStore<S>>>,
    settings: VersionSettings,
    enabled: bool,
    state: Arc<Mutex<EditState>>,
    timer: Option<JoinHandle<()>>,
}

impl<S: Storage + 'static> AutoVersioner<S> {
    /// Create a policy for a document whose current text is
    /// `initial_content`.
    pub fn new(
        store: Arc<Mutex<VersionStore<S>>>,
        settings: VersionSettings,
        initial_content: impl Into<String>,
        enabled: bool,
    ) -> Self {
        let initial = initial_content.into();
        Self {
            store,
            settings,
            enabled,
            state: Arc::new(Mutex::new(EditState {
                content: initial.clone(),
                last_saved: initial,
            })),
            timer: None,
        }
    }

    /// Whether the timer will commit at all.
    pub fn is_auto_save_enabled(&self) -> bool {
        self.enabled && self.settings.auto_save
    }

    /// Record an edit and push the commit deadline out.
    ///
    /// Debounce, not throttle: rapid edits keep rescheduling, so nothing is
    /// committed until the writer has been quiet for the full interval.
    pub async fn content_changed(&mut self, content: impl Into<String>) {
        {
            let mut state = self.state.lock().await;
            state.content = content.into();
        }
        self.reset_timer();
    }

    /// Commit immediately with the caller's message, bypassing the size
    /// threshold, then re-arm the timer.
    pub async fn manual_save(&mut self, message: impl Into<String>) -> Option<Version> {
        self.cancel_timer();

        let version = {
            let mut state = self.state.lock().await;
            let content = state.content.clone();
            let version = self
                .store
                .lock()
                .await
                .create_version(&content, Some(message.into()), Vec::new())
                .await;
            state.last_saved = content;
            version
        };

        self.reset_timer();
        version
    }

    /// Teardown flush: cancel the timer and commit any uncommitted change of
    /// nonzero size with a distinguishing message.
    ///
    /// Best-effort only. If the process dies before this runs, the edit is
    /// not versioned. The size check is the same length-delta heuristic the
    /// timer uses, so an equal-length edit is not flushed either.
    pub async fn close(&mut self) {
        self.cancel_timer();

        if !self.is_auto_save_enabled() {
            return;
        }

        let mut state = self.state.lock().await;
        let change_size = length_delta(&state.last_saved, &state.content);
        if change_size > 0 {
            let content = state.content.clone();
            self.store
                .lock()
                .await
                .create_version(&content, Some(SESSION_END_MESSAGE.to_string()), Vec::new())
                .await;
            state.last_saved = content;
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Re-arm the debounce timer. When it fires, the content is committed
    /// only if the length delta since the last commit reaches
    /// `min_change_size`.
    fn reset_timer(&mut self) {
        self.cancel_timer();

        if !self.is_auto_save_enabled() {
            return;
        }

        let store = Arc::clone(&self.store);
        let state = Arc::clone(&self.state);
        let delay = self.settings.auto_save_delay();
        let min_change_size = self.settings.min_change_size;

        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut state = state.lock().await;
            let change_size = length_delta(&state.last_saved, &state.content);
            if change_size < min_change_size {
                debug!(
                    change_size,
                    min_change_size, "Auto-save skipped, change below threshold"
                );
                return;
            }

            let content = state.content.clone();
            store
                .lock()
                .await
                .create_version(&content, Some(AUTO_SAVE_MESSAGE.to_string()), Vec::new())
                .await;
            state.last_saved = content;
        }));
    }
}

impl<S: Storage + 'static> Drop for AutoVersioner<S> {
    fn drop(&mut self) {
        // The async flush in close() cannot run here; just stop the timer.
        self.cancel_timer();
    }
}

/// Character-count length delta between two texts.
fn length_delta(old: &str, new: &str) -> usize {
    old.chars().count().abs_diff(new.chars().count())
}
