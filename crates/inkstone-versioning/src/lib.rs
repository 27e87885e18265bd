//! Local version history for inkstone documents.
//!
//! Every editable document (chapter, plot, character, world setting) has one
//! version stream: an ordered list of full-content snapshots with optional
//! labels and pinning tags. This crate provides:
//! - A positional line diff for display ([`diff`])
//! - A persisted per-document version store with tag-aware retention
//!   ([`VersionStore`])
//! - A debounced timer policy that commits versions automatically while the
//!   writer works ([`AutoVersioner`])
//!
//! Restore always returns the stored snapshot verbatim; diffs are derived
//! and display-only.
//!
//! # Example
//!
//! ```no_run
//! use inkstone_storage::MemoryStorage;
//! use inkstone_versioning::{EntityKind, VersionSettings, VersionStore};
//!
//! # async fn example() {
//! let settings = VersionSettings::default();
//! let mut store =
//!     VersionStore::open(MemoryStorage::new(), "chp_01", EntityKind::Chapter, settings).await;
//!
//! // Commit a manual snapshot before a big rewrite
//! let version = store
//!     .create_version("Chapter one draft...", Some("before rewrite".to_string()), Vec::new())
//!     .await;
//!
//! // Later, bring the old text back (history is kept intact)
//! if let Some(version) = version {
//!     let _old_text = store.restore_version(&version.id);
//! }
//! # }
//! ```

pub mod autosave;
pub mod diff;
pub mod settings;
pub mod store;
pub mod version;

pub use autosave::{AutoVersioner, AUTO_SAVE_MESSAGE, SESSION_END_MESSAGE};
pub use diff::{apply_diff, compute_diff, format_diff, Change, ChangeKind, Diff};
pub use settings::VersionSettings;
pub use store::VersionStore;
pub use version::{EntityKind, Version, VersionHistory, VersionStats};
