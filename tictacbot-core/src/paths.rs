// ABOUTME: XDG Base Directory paths for configuration
// ABOUTME: Provides the standard config file location with a cwd fallback

use directories::ProjectDirs;
use std::path::PathBuf;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "tictacbot";
const APPLICATION: &str = "tictacbot";

/// Get XDG-compliant directories for the application
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the config directory path (e.g., ~/.config/tictacbot/)
/// Falls back to current directory if XDG directories unavailable
pub fn config_dir() -> PathBuf {
    project_dirs()
        .map(|p| p.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the default config file path
/// e.g., ~/.config/tictacbot/config.toml
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
