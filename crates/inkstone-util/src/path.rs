//! Path utilities.
//!
//! This module resolves the directories inkstone stores its data in.

use std::path::PathBuf;

/// Get the inkstone configuration directory.
///
/// This follows XDG conventions on Linux/macOS:
/// - `$XDG_CONFIG_HOME/inkstone` if set
/// - `~/.config/inkstone` otherwise
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("inkstone"))
}

/// Get the inkstone data directory.
///
/// This follows XDG conventions:
/// - `$XDG_DATA_HOME/inkstone` if set
/// - `~/.local/share/inkstone` otherwise
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("inkstone"))
}
