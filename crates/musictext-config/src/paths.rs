//! Platform-specific locations.
//!
//! - **Config file**: `~/.config/musictext/config.toml` (Linux),
//!   `~/Library/Application Support/musictext/config.toml` (macOS),
//!   `%APPDATA%\musictext\config.toml` (Windows)
//! - **Song store**: `~/.local/share/musictext/songs/` (Linux),
//!   `~/Library/Application Support/musictext/songs/` (macOS),
//!   `%APPDATA%\musictext\songs\` (Windows)

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "musictext";

/// File name of the render configuration.
const CONFIG_FILE: &str = "config.toml";

/// Subdirectory of the data directory holding rendered songs.
const STORE_SUBDIR: &str = "songs";

/// Returns the user-specific configuration directory.
///
/// Falls back to the current directory if the platform directory cannot be
/// determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific data directory.
pub fn user_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the configuration file read when no `--config` is given.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Song store directory used when neither config nor flags name one.
pub fn default_store_dir() -> PathBuf {
    user_data_dir().join(STORE_SUBDIR)
}
